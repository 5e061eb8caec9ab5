pub mod error;

pub use error::{BuildDiagnostic, SemanticError};
