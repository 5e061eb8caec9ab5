//! Where a lookup is made from.

use std::path::{Path, PathBuf};

use crate::core::{IStr, normalize_path};
use crate::semantic::symbol_table::{PathKind, SymbolTable};

/// The vantage point of a resolution request.
///
/// Determines which `private/` folders and which namespace the requesting
/// code can see. A context with no directory behaves like the command
/// line: only plain and qualified names resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Directory of the requesting file, normalized.
    pub dir: Option<PathBuf>,
    /// Dotted namespace prefix if the requesting file sits inside `+ns`
    /// folders.
    pub namespace: Option<IStr>,
}

impl ResolutionContext {
    /// A context with no vantage point: global visibility rules only.
    pub fn global() -> Self {
        Self::default()
    }

    /// Context for code in a specific directory, outside any namespace.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: Some(normalize_path(dir)),
            namespace: None,
        }
    }

    /// Context for a source file, deriving the namespace from the path
    /// entry the file's symbols belong to.
    pub fn for_file(table: &SymbolTable, file: &Path) -> Self {
        let normalized = normalize_path(file);
        let dir = normalized.parent().map(Path::to_path_buf);
        let namespace = table
            .symbols_for_file(&normalized)
            .first()
            .and_then(|symbol| match &table.entry(symbol.entry).kind {
                PathKind::Namespace { prefix } => Some(IStr::clone(prefix)),
                _ => None,
            });
        Self { dir, namespace }
    }

    pub fn with_namespace(mut self, prefix: IStr) -> Self {
        self.namespace = Some(prefix);
        self
    }
}
