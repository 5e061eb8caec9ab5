//! Query API over a built workspace.

use std::path::Path;
use std::sync::Arc;

use crate::core::normalize_path;
use crate::project::parse_cache::ParseCache;
use crate::semantic::graphs::{ClassGraphBuilder, ClassNode};
use crate::semantic::resolver::{Resolution, ResolutionContext, Resolver};
use crate::semantic::symbol_table::SymbolTable;
use crate::semantic::types::BuildDiagnostic;

use super::core::Workspace;

impl Workspace {
    /// Resolve a name as seen from `from` (a source file on the path),
    /// or from nowhere in particular when `from` is `None`.
    pub fn resolve(&self, name: &str, from: Option<&Path>) -> Resolution<'_> {
        let ctx = match from {
            Some(file) => ResolutionContext::for_file(&self.table, file),
            None => ResolutionContext::global(),
        };
        Resolver::new(&self.table).resolve(name, &ctx)
    }

    /// Resolve `name` to a class and return its node with the flattened
    /// member table, building (and memoizing) hierarchy nodes on demand.
    ///
    /// Returns `None` when the name does not resolve to a classdef symbol.
    pub fn class_info(&mut self, name: &str, from: Option<&Path>) -> Option<&ClassNode> {
        let symbol = self.resolve(name, from).found()?.clone();
        if !symbol.is_class() {
            return None;
        }
        let qualified_name = symbol.qualified_name.to_string();
        ClassGraphBuilder::new(&self.table, &mut self.graph).build(&symbol);
        self.graph.get(&qualified_name)
    }

    /// Symbols indexed from one file, e.g. to answer "what does this
    /// file define".
    pub fn symbols_in_file(&self, file: &Path) -> Vec<&crate::semantic::symbol_table::Symbol> {
        self.table.symbols_for_file(&normalize_path(file))
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    pub fn diagnostics(&self) -> &[BuildDiagnostic] {
        &self.diagnostics
    }

    /// False when the last build was cancelled before finishing.
    pub fn is_complete(&self) -> bool {
        self.table.is_complete()
    }
}
