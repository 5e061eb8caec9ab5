use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::normalize_path;
use crate::project::parse_cache::ParseCache;
use crate::project::scanner::{DirectoryProvider, FsDirectoryProvider, Scanner};
use crate::semantic::graphs::ClassGraph;
use crate::semantic::symbol_table::SymbolTable;
use crate::semantic::types::{BuildDiagnostic, SemanticError};

/// Owns one search path and everything derived from it: the symbol
/// table, the class graph, the skeleton cache and build diagnostics.
pub struct Workspace {
    pub(super) roots: Vec<PathBuf>,
    pub(super) table: SymbolTable,
    pub(super) graph: ClassGraph,
    pub(super) cache: Arc<ParseCache>,
    pub(super) diagnostics: Vec<BuildDiagnostic>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(ParseCache::new()))
    }

    /// Share a skeleton cache across workspaces (or keep a handle for
    /// inspection).
    pub fn with_cache(cache: Arc<ParseCache>) -> Self {
        Self {
            roots: Vec::new(),
            table: SymbolTable::new(),
            graph: ClassGraph::new(),
            cache,
            diagnostics: Vec::new(),
        }
    }

    /// Append a directory to the search path. Earlier directories shadow
    /// later ones; call order is path order. Takes effect on the next
    /// [`build`](Self::build).
    pub fn add_path(&mut self, dir: impl Into<PathBuf>) {
        let dir = normalize_path(&dir.into());
        if !self.roots.contains(&dir) {
            self.roots.push(dir);
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Build the index from the filesystem.
    pub fn build(&mut self) -> Result<(), SemanticError> {
        self.build_with(&FsDirectoryProvider, None)
    }

    /// Build the index from an arbitrary provider, optionally cancellable.
    ///
    /// Replaces the table and diagnostics wholesale and drops all class
    /// graph nodes; class info is rebuilt lazily on the next query.
    pub fn build_with<P: DirectoryProvider>(
        &mut self,
        provider: &P,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), SemanticError> {
        let mut scanner = Scanner::new(provider, &self.cache);
        if let Some(token) = cancel {
            scanner = scanner.with_cancellation(token);
        }
        let outcome = scanner.scan(&self.roots)?;
        info!(
            "[WORKSPACE] indexed {} symbols across {} entries ({} diagnostics)",
            outcome.table.symbol_count(),
            outcome.table.entries().len(),
            outcome.diagnostics.len()
        );
        self.table = outcome.table;
        self.diagnostics = outcome.diagnostics;
        self.graph.clear();
        Ok(())
    }

    /// Re-index after the given files changed on disk.
    ///
    /// Invalidates the changed files' cache entries (plus their cache
    /// dependents) and their class graph nodes (plus inheriting nodes),
    /// then re-scans; unchanged files come out of the cache.
    pub fn rebuild(&mut self, changed: &[PathBuf]) -> Result<(), SemanticError> {
        self.rebuild_with(&FsDirectoryProvider, changed)
    }

    pub fn rebuild_with<P: DirectoryProvider>(
        &mut self,
        provider: &P,
        changed: &[PathBuf],
    ) -> Result<(), SemanticError> {
        for path in changed {
            let normalized = normalize_path(path);
            debug!("[WORKSPACE] invalidating {}", normalized.display());
            // Cache invalidation cascades to dependents (class folder
            // definition files whose merged skeleton used this file);
            // drop the graph nodes of everything it touched.
            for dropped in self.cache.invalidate(&normalized) {
                for qname in self.table.qualified_names_for_file(&dropped) {
                    self.graph.invalidate(&qname);
                }
                self.graph.invalidate_file(&dropped);
            }
            // A brand-new sibling in an @name folder has no cache entry
            // yet; invalidate through the folder's definition file.
            if let Some(main) = class_folder_main(&normalized) {
                for qname in self.table.qualified_names_for_file(&main) {
                    self.graph.invalidate(&qname);
                }
            }
        }

        let outcome = Scanner::new(provider, &self.cache).scan(&self.roots)?;
        self.table = outcome.table;
        self.diagnostics = outcome.diagnostics;

        // Names the changed files define now may previously have been
        // missing superclasses; drop the Partial nodes waiting on them.
        for path in changed {
            let normalized = normalize_path(path);
            for qname in self.table.qualified_names_for_file(&normalized) {
                self.graph.invalidate(&qname);
            }
        }
        Ok(())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// If `file` sits inside an `@name` folder, the folder's `name.m`
/// definition file.
fn class_folder_main(file: &std::path::Path) -> Option<PathBuf> {
    let parent = file.parent()?;
    let folder = parent.file_name()?.to_str()?;
    let class_name = folder.strip_prefix('@')?;
    Some(parent.join(format!("{class_name}.m")))
}
