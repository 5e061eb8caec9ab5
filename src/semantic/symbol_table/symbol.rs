//! Indexed symbols: a file skeleton bound to its search path position.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::IStr;
use crate::parser::{FileKind, FileSkeleton};

use super::entry::EntryId;

/// Identifier for a symbol in the table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkeletonId(u32);

impl SkeletonId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One indexed symbol: a parsed file skeleton plus where it came from.
///
/// The skeleton payload is shared (`Arc`) with the parse cache, so
/// re-indexing an unchanged file never re-allocates its structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Full dotted name, e.g. `circle` or `pkg.inner.circle`.
    pub qualified_name: IStr,
    /// Source file the skeleton was extracted from, normalized.
    pub file: PathBuf,
    /// The path entry (directory) this symbol belongs to.
    pub entry: EntryId,
    pub skeleton: Arc<FileSkeleton>,
}

impl Symbol {
    pub fn kind(&self) -> FileKind {
        self.skeleton.kind
    }

    pub fn is_class(&self) -> bool {
        self.skeleton.is_class()
    }
}
