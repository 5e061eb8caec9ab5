//! Workspace façade tying together scan, index, resolution and class info.

pub mod core;
pub mod queries;

pub use self::core::Workspace;
