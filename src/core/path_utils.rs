//! Path normalization utilities for consistent file path handling.
//!
//! Directory and file paths are used as keys throughout the symbol table,
//! the parse cache, and resolution contexts. Normalizing them once at the
//! boundary keeps lookups consistent regardless of how the caller spelled
//! the path.

use std::path::{Path, PathBuf};

/// Normalize a path for consistent storage and lookup.
///
/// Attempts canonicalization to resolve symlinks and relative components.
/// If canonicalization fails (e.g. the file no longer exists), falls back
/// to joining relative paths onto the current directory so that the result
/// is at least absolute and stable within one process.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relative_path_is_absolute() {
        let normalized = normalize_path(Path::new("does_not_exist.m"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("does_not_exist.m"));
    }

    #[test]
    fn test_normalize_absolute_missing_path_unchanged() {
        let path = Path::new("/nonexistent/dir/thing.m");
        assert_eq!(normalize_path(path), PathBuf::from("/nonexistent/dir/thing.m"));
    }

    #[test]
    fn test_normalize_existing_dir_canonicalizes() {
        let dir = std::env::temp_dir();
        let normalized = normalize_path(&dir);
        assert!(normalized.is_absolute());
    }
}
