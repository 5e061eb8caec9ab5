//! Parse failures reported by the skeleton extractor.

use std::path::PathBuf;

use text_size::TextRange;
use thiserror::Error;

/// Errors produced while extracting a file skeleton.
///
/// A failed file is reported and skipped; it never aborts an index build.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("invalid identifier: {0:?}")]
    InvalidName(String),

    #[error("unexpected end of file while parsing {context}")]
    UnexpectedEof { context: &'static str },

    #[error("expected {expected} at {at:?}")]
    Unexpected { expected: &'static str, at: TextRange },

    #[error("failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },
}

impl ParseFailure {
    pub fn io(path: PathBuf, err: &std::io::Error) -> Self {
        Self::Io {
            path,
            message: err.to_string(),
        }
    }
}
