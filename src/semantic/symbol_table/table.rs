use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::{IStr, Interner, normalize_path};
use crate::parser::FileSkeleton;
use crate::semantic::types::SemanticError;

use super::entry::{EntryId, PathEntry, PathKind};
use super::symbol::{SkeletonId, Symbol};

/// The path index: every symbol reachable from the search path, with
/// enough structure to answer rank-ordered lookups.
pub struct SymbolTable {
    /// Ordered search path entries; ranks strictly increase.
    pub(super) entries: Vec<PathEntry>,
    /// Arena storage for all symbols - single source of truth
    pub(super) arena: Vec<Symbol>,
    /// Index for qualified name lookups: qname -> candidate SkeletonIds,
    /// sorted by (rank, kind precedence), ties in insertion order.
    pub(super) candidates: FxHashMap<IStr, Vec<SkeletonId>>,
    /// Index mapping file paths to SkeletonIds of symbols from that file
    pub(super) symbols_by_file: FxHashMap<PathBuf, Vec<SkeletonId>>,
    pub(super) interner: Interner,
    /// Set when an index build was cancelled before covering every entry.
    incomplete: bool,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            arena: Vec::new(),
            candidates: FxHashMap::default(),
            symbols_by_file: FxHashMap::default(),
            interner: Interner::new(),
            incomplete: false,
        }
    }

    // ============================================================
    // Path Entries
    // ============================================================

    /// Append a directory with the next free rank.
    pub fn push_entry(&mut self, dir: PathBuf, kind: PathKind) -> EntryId {
        let rank = self
            .entries
            .last()
            .map(|e| e.rank + 1)
            .unwrap_or(0);
        // Ranks assigned here can never collide.
        match self.push_entry_with_rank(dir, rank, kind) {
            Ok(id) => id,
            Err(_) => unreachable!("next free rank always exceeds the previous"),
        }
    }

    /// Append a directory with an explicit rank.
    ///
    /// Ranks must strictly increase across the table; anything else is an
    /// index corruption and is rejected.
    pub fn push_entry_with_rank(
        &mut self,
        dir: PathBuf,
        rank: u32,
        kind: PathKind,
    ) -> Result<EntryId, SemanticError> {
        if let Some(last) = self.entries.last() {
            if rank <= last.rank {
                return Err(SemanticError::RankCollision {
                    rank,
                    previous: last.rank,
                });
            }
        }
        let id = EntryId::new(self.entries.len());
        self.entries.push(PathEntry {
            dir: normalize_path(&dir),
            rank,
            kind,
        });
        Ok(id)
    }

    pub fn entry(&self, id: EntryId) -> &PathEntry {
        &self.entries[id.index()]
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    // ============================================================
    // Symbol Insertion
    // ============================================================

    /// Insert a symbol for `entry`, keeping the candidate list for its
    /// qualified name sorted by (rank, kind precedence). Equal keys keep
    /// insertion order, which is scan order.
    pub fn insert(
        &mut self,
        qualified_name: &str,
        file: PathBuf,
        entry: EntryId,
        skeleton: Arc<FileSkeleton>,
    ) -> SkeletonId {
        let qualified_name = self.interner.intern(qualified_name);
        let file = normalize_path(&file);

        let id = SkeletonId::new(self.arena.len());
        self.arena.push(Symbol {
            qualified_name: Arc::clone(&qualified_name),
            file: file.clone(),
            entry,
            skeleton,
        });

        let key = self.arena_key(id);
        // Insert after all candidates with a key <= ours (stable order).
        let pos = match self.candidates.get(&qualified_name) {
            Some(list) => list.partition_point(|&other| self.arena_key(other) <= key),
            None => 0,
        };
        self.candidates
            .entry(qualified_name)
            .or_default()
            .insert(pos, id);

        self.symbols_by_file.entry(file).or_default().push(id);
        id
    }

    fn arena_key(&self, id: SkeletonId) -> (u32, u8) {
        let symbol = &self.arena[id.index()];
        let rank = self.entries[symbol.entry.index()].rank;
        (rank, symbol.kind().precedence())
    }

    // ============================================================
    // Data Access
    // ============================================================

    /// Get a symbol by its SkeletonId (O(1) arena lookup)
    pub fn get(&self, id: SkeletonId) -> Option<&Symbol> {
        self.arena.get(id.index())
    }

    /// All candidates for a qualified name, best (lowest rank, highest
    /// precedence) first.
    pub fn candidate_ids(&self, qualified_name: &str) -> &[SkeletonId] {
        self.candidates
            .get(qualified_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The single best symbol for a qualified name, ignoring visibility.
    pub fn first_candidate(&self, qualified_name: &str) -> Option<&Symbol> {
        self.candidate_ids(qualified_name)
            .first()
            .and_then(|&id| self.get(id))
    }

    /// Number of indexed symbols, including any unlinked arena slots.
    pub fn symbol_count(&self) -> usize {
        self.arena.len()
    }

    pub fn mark_incomplete(&mut self) {
        self.incomplete = true;
    }

    /// False when a cancelled build left the index partial.
    pub fn is_complete(&self) -> bool {
        !self.incomplete
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("entries", &self.entries.len())
            .field("symbols", &self.arena.len())
            .field("names", &self.candidates.len())
            .field("incomplete", &self.incomplete)
            .finish()
    }
}
