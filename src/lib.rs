//! # matpath
//!
//! Search-path symbol resolution and class hierarchy analysis for MATLAB
//! code trees: scan ordered directories, extract file skeletons, resolve
//! names with shadowing/visibility rules, and flatten class inheritance.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic::workspace → Workspace façade (build, resolve, class_info, rebuild)
//!   ↓
//! project             → Directory scanning, skeleton cache
//!   ↓
//! semantic            → Path index, name resolver, class graph
//!   ↓
//! parser              → Logos lexer, structural skeleton extractor
//!   ↓
//! core                → Primitives (string interning, path normalization)
//! ```

// ============================================================================
// MODULES (dependency order: core → parser → semantic → project)
// ============================================================================

/// Foundation types: string interning, path normalization
pub mod core;

/// Skeleton extractor: Logos lexer, structural MATLAB parsing
pub mod parser;

/// Semantic model: symbol table, resolver, class graph, workspace
pub mod semantic;

/// Project management: path scanning, skeleton cache
pub mod project;

// Re-export the primary API surface
pub use parser::{FileKind, FileSkeleton, Member, MemberKind, ParseFailure, Visibility};
pub use project::{DirEntryInfo, DirectoryProvider, FsDirectoryProvider, ParseCache, Signature};
pub use semantic::{
    BuildDiagnostic, ClassNode, FlatMember, Resolution, ResolutionContext, ResolutionState,
    SemanticError, Symbol, Workspace,
};

// Re-export foundation types
pub use crate::core::{IStr, Interner};
