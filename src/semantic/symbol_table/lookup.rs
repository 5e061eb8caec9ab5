//! Query and removal operations on the path index.

use std::path::Path;

use crate::core::{IStr, normalize_path};

use super::symbol::Symbol;
use super::table::SymbolTable;

impl SymbolTable {
    /// Iterate the candidates for a qualified name, best first.
    pub fn candidates_for<'a>(
        &'a self,
        qualified_name: &str,
    ) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.candidate_ids(qualified_name)
            .iter()
            .filter_map(|&id| self.get(id))
    }

    /// Get all symbols defined in a specific file.
    ///
    /// Uses the file index for O(1) lookup; paths are normalized first.
    pub fn symbols_for_file(&self, file: &Path) -> Vec<&Symbol> {
        let normalized = normalize_path(file);
        self.symbols_by_file
            .get(&normalized)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get(id))
            .collect()
    }

    /// Qualified names of all symbols defined in a specific file.
    ///
    /// Used by incremental rebuilds to know which class graph nodes to
    /// invalidate before the file's symbols are replaced.
    pub fn qualified_names_for_file(&self, file: &Path) -> Vec<IStr> {
        self.symbols_for_file(file)
            .into_iter()
            .map(|s| IStr::clone(&s.qualified_name))
            .collect()
    }

    /// Unlink every symbol that came from `file`, returning the qualified
    /// names that were removed.
    ///
    /// Arena slots are left in place and become unreachable; rebuilding a
    /// file is rare enough that compacting the arena is not worth the id
    /// churn it would cause.
    pub fn remove_symbols_from_file(&mut self, file: &Path) -> Vec<IStr> {
        let normalized = normalize_path(file);
        let Some(ids) = self.symbols_by_file.remove(&normalized) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(symbol) = self.get(id) else { continue };
            let qname = IStr::clone(&symbol.qualified_name);
            if let Some(list) = self.candidates.get_mut(&qname) {
                list.retain(|&other| other != id);
                if list.is_empty() {
                    self.candidates.remove(&qname);
                }
            }
            removed.push(qname);
        }
        removed
    }
}
