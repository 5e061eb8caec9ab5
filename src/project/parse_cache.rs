//! Skeleton cache keyed by file signature.
//!
//! Re-scans hit the cache for unchanged files; a changed file invalidates
//! its own entry plus the entries that registered themselves as dependent
//! on it (class folder siblings depend on their definition file).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::core::normalize_path;
use crate::parser::FileSkeleton;

/// Cheap change detector: modification time plus size.
///
/// Content hashing is deliberately avoided; a stale hit requires an mtime
/// and size collision, which editors do not produce in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    mtime: SystemTime,
    size: u64,
}

impl Signature {
    pub fn probe(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            mtime: metadata.modified()?,
            size: metadata.len(),
        })
    }

    #[cfg(test)]
    pub fn synthetic(mtime: SystemTime, size: u64) -> Self {
        Self { mtime, size }
    }
}

struct CacheEntry {
    signature: Signature,
    skeleton: Arc<FileSkeleton>,
    /// Files whose skeletons were derived using this file's content.
    dependents: FxHashSet<PathBuf>,
}

/// Thread-safe skeleton cache shared across index builds.
#[derive(Default)]
pub struct ParseCache {
    entries: RwLock<FxHashMap<PathBuf, CacheEntry>>,
    recomputations: AtomicU64,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached skeleton, verifying the signature still matches.
    /// A stale entry misses; the caller is expected to re-parse and
    /// [`insert`](Self::insert) the replacement.
    pub fn get(&self, path: &Path, signature: &Signature) -> Option<Arc<FileSkeleton>> {
        let normalized = normalize_path(path);
        let entries = self.entries.read();
        let entry = entries.get(&normalized)?;
        if entry.signature != *signature {
            trace!("[CACHE] stale signature for {}", normalized.display());
            return None;
        }
        Some(Arc::clone(&entry.skeleton))
    }

    /// Store a freshly parsed skeleton. Counts as one recomputation.
    pub fn insert(&self, path: &Path, signature: Signature, skeleton: Arc<FileSkeleton>) {
        let normalized = normalize_path(path);
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write();
        let dependents = entries
            .remove(&normalized)
            .map(|old| old.dependents)
            .unwrap_or_default();
        entries.insert(
            normalized,
            CacheEntry {
                signature,
                skeleton,
                dependents,
            },
        );
    }

    /// Record that `dependent`'s cached skeleton was derived from `path`.
    pub fn record_dependent(&self, path: &Path, dependent: &Path) {
        let normalized = normalize_path(path);
        let mut entries = self.entries.write();
        entries
            .entry(normalized)
            .or_insert_with(|| CacheEntry {
                // Placeholder; a real signature arrives with insert().
                signature: Signature {
                    mtime: SystemTime::UNIX_EPOCH,
                    size: u64::MAX,
                },
                skeleton: Arc::new(FileSkeleton::opaque_function("placeholder")),
                dependents: FxHashSet::default(),
            })
            .dependents
            .insert(normalize_path(dependent));
    }

    /// Drop a file's entry and the entries of its direct dependents.
    ///
    /// Returns every path whose entry was dropped (the file itself
    /// included), so callers can cascade into their own derived state.
    pub fn invalidate(&self, path: &Path) -> Vec<PathBuf> {
        let normalized = normalize_path(path);
        let mut entries = self.entries.write();
        let mut dropped = vec![normalized.clone()];
        if let Some(entry) = entries.remove(&normalized) {
            trace!(
                "[CACHE] invalidated {} (+{} dependents)",
                normalized.display(),
                entry.dependents.len()
            );
            for dependent in entry.dependents {
                entries.remove(&dependent);
                dropped.push(dependent);
            }
        }
        dropped
    }

    /// Total number of parses performed on behalf of this cache.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
