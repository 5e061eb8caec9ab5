//! Skeleton extractor for MATLAB source files.
//!
//! The extractor is structural only: it recognizes classdef headers,
//! properties/methods blocks with access attributes, function declarations
//! and local functions, and treats everything else as opaque text.

pub mod errors;
pub mod lexer;
pub mod skeleton;

pub use errors::ParseFailure;
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use skeleton::{
    FileKind, FileSkeleton, Member, MemberKind, Visibility, is_valid_name, parse_source,
};
