//! Semantic layer: the path index, name resolution, class hierarchy
//! flattening and the workspace façade.

pub mod graphs;
pub mod resolver;
pub mod symbol_table;
pub mod types;
pub mod workspace;

pub use graphs::{ClassGraph, ClassNode, FlatMember, ResolutionState};
pub use resolver::{Resolution, ResolutionContext, Resolver};
pub use symbol_table::{PathEntry, PathKind, Symbol, SymbolTable};
pub use types::{BuildDiagnostic, SemanticError};
pub use workspace::Workspace;
