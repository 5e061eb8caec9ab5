pub mod interner;
pub mod path_utils;

pub use interner::{IStr, Interner};
pub use path_utils::normalize_path;
