//! Project layer: search path scanning and the skeleton cache.

pub mod parse_cache;
pub mod scanner;

pub use parse_cache::{ParseCache, Signature};
pub use scanner::{DirEntryInfo, DirectoryProvider, FsDirectoryProvider, ScanOutcome, Scanner};
