//! Search path entries: the ordered directories symbols come from.

use std::path::PathBuf;

use crate::core::IStr;

/// Identifier for a [`PathEntry`] in the table's entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a directory participates in resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKind {
    /// A directory listed on the search path, or a class folder's parent.
    /// Its symbols are visible everywhere by simple name.
    Plain,
    /// A `private/` folder. Its symbols are visible only to files directly
    /// inside `parent` and to siblings inside the folder itself.
    Private { parent: PathBuf },
    /// A `+name` namespace folder. Its symbols carry the dotted `prefix`
    /// and are visible by qualified name everywhere, or unqualified from
    /// files inside the same namespace.
    Namespace { prefix: IStr },
}

/// One directory contributing symbols, with its position on the search path.
///
/// `rank` is strictly increasing across the table; lower ranks shadow
/// higher ones. Derived entries (`private/`, `+ns/`) take the next rank
/// after their parent so they inherit its position on the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub dir: PathBuf,
    pub rank: u32,
    pub kind: PathKind,
}
