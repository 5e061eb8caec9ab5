//! Error types for index construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseFailure;

/// Fatal errors that abort an index build.
///
/// Per-file problems are reported as [`BuildDiagnostic`]s instead; only
/// violations of the index's own invariants end up here.
#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("search path rank {rank} does not exceed previous rank {previous}")]
    RankCollision { rank: u32, previous: u32 },

    #[error("failed to scan {path:?}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal problem encountered while building the index.
///
/// The build continues; what the index retains depends on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildDiagnostic {
    /// A source file could not be parsed into a skeleton; it is excluded
    /// from the index.
    Parse { file: PathBuf, failure: ParseFailure },
    /// An `@name` folder without a `name.m` definition file inside it.
    /// The class is still indexed with its sibling methods only.
    ClassFolderMissingMain { dir: PathBuf },
}

impl BuildDiagnostic {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Parse { file, .. } => file,
            Self::ClassFolderMissingMain { dir } => dir,
        }
    }
}
