//! The path index: symbols contributed by the ordered search path.
//!
//! Storage is an arena of [`Symbol`]s plus per-qualified-name candidate
//! lists kept sorted by (rank, kind precedence). Resolution policy lives
//! in [`crate::semantic::resolver`]; this module is pure data.

pub mod entry;
pub mod lookup;
pub mod symbol;
pub mod table;

pub use entry::{EntryId, PathEntry, PathKind};
pub use symbol::{SkeletonId, Symbol};
pub use table::SymbolTable;
