//! Logos-based lexer for MATLAB source files
//!
//! Fast tokenization of the structural subset of MATLAB that the skeleton
//! extractor cares about: declaration keywords, identifiers, comments,
//! brackets, and line structure. Expression-level syntax is deliberately
//! lexed only coarsely.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Trivia never affects the structural shape of a file.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Continuation
        )
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match result {
            Ok(kind) => kind,
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Token kinds for the structural MATLAB subset
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t]+")]
    Whitespace,

    /// `...` swallows the rest of the line including the newline, so a
    /// continued declaration header lexes as one logical line.
    #[regex(r"\.\.\.[^\n]*\n?")]
    Continuation,

    #[regex(r"%\{[ \t]*\n([^%]|%[^}])*%\}")]
    BlockComment,

    #[regex(r"%[^\n]*")]
    LineComment,

    // =========================================================================
    // LINE STRUCTURE
    // =========================================================================
    #[regex(r"\r?\n")]
    Newline,

    // =========================================================================
    // DECLARATION KEYWORDS
    // =========================================================================
    #[token("classdef")]
    ClassdefKw,

    #[token("function")]
    FunctionKw,

    #[token("properties")]
    PropertiesKw,

    #[token("methods")]
    MethodsKw,

    #[token("events")]
    EventsKw,

    #[token("enumeration")]
    EnumerationKw,

    #[token("arguments")]
    ArgumentsKw,

    #[token("end")]
    EndKw,

    /// Keywords that open an `end`-terminated control block.
    #[token("if")]
    #[token("for")]
    #[token("while")]
    #[token("switch")]
    #[token("try")]
    #[token("parfor")]
    #[token("spmd")]
    BlockKw,

    // =========================================================================
    // NAMES & LITERALS
    // =========================================================================
    /// MATLAB identifiers are ASCII: a letter followed by letters, digits,
    /// or underscores.
    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    /// Char array literal. The transpose operator also uses `'`; an
    /// unpaired quote lexes as [`TokenKind::OtherChar`] and stays opaque
    /// expression text.
    #[regex(r"'[^'\n]*'")]
    CharLiteral,

    #[regex(r#""[^"\n]*""#)]
    StringLiteral,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token("&")]
    Amp,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    /// Any other single character (operators, `@`, `!`, stray quotes).
    #[regex(r".", priority = 1)]
    OtherChar,

    Error,
}
