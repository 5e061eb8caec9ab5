//! Structural skeleton extraction for MATLAB files.
//!
//! Extracts only the declaration-level shape of a file: whether it is a
//! script, a function file, or a classdef file, plus superclasses, property
//! and method members with access visibility, and local function names.
//! Function bodies are skipped with block-nesting bookkeeping; statements
//! inside them are never interpreted.

use smol_str::SmolStr;

use super::errors::ParseFailure;
use super::lexer::{Token, TokenKind, tokenize};

// =============================================================================
// SKELETON MODEL
// =============================================================================

/// What kind of program unit a file defines.
///
/// Ordering matters: within one directory a classdef shadows a function of
/// the same name, which shadows a script. Variants are declared in
/// precedence order so `FileKind::precedence` can derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    Classdef,
    Function,
    Script,
}

impl FileKind {
    /// Shadowing precedence within a directory. Lower wins.
    pub fn precedence(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Method,
}

/// Member visibility, collapsed from MATLAB's attribute matrix.
///
/// `Access = public` (or an unrestricted default) maps to `Public`;
/// everything else (`private`, `protected`, metaclass lists) maps to
/// `Private` for the purposes of the flattened member table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// A property or method declared by a classdef file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: SmolStr,
    pub kind: MemberKind,
    pub visibility: Visibility,
}

impl Member {
    pub fn new(name: impl Into<SmolStr>, kind: MemberKind, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility,
        }
    }
}

/// The extracted structural shape of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSkeleton {
    /// Name the file contributes to the search path (the file stem).
    pub name: SmolStr,
    /// Name written in the classdef or function header, if any. May differ
    /// from `name`; the file stem always wins for resolution.
    pub declared_name: Option<SmolStr>,
    pub kind: FileKind,
    /// Superclass names exactly as written, possibly dotted.
    pub superclasses: Vec<SmolStr>,
    /// Properties and methods, in declaration order.
    pub members: Vec<Member>,
    /// Local (sub)function names. Recorded for completeness; local
    /// functions are never indexed as path symbols.
    pub local_functions: Vec<SmolStr>,
}

impl FileSkeleton {
    /// Skeleton for a file whose contents cannot be read, such as a
    /// p-coded file. It participates in shadowing as a function.
    pub fn opaque_function(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            declared_name: None,
            kind: FileKind::Function,
            superclasses: Vec::new(),
            members: Vec::new(),
            local_functions: Vec::new(),
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == FileKind::Classdef
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Whether `name` is a legal MATLAB identifier.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Extract the skeleton of a file from its source text.
///
/// `file_stem` is the file name without extension; it becomes the symbol
/// name regardless of what the header inside declares.
pub fn parse_source(file_stem: &str, source: &str) -> Result<FileSkeleton, ParseFailure> {
    if !is_valid_name(file_stem) {
        return Err(ParseFailure::InvalidName(file_stem.to_string()));
    }

    let tokens: Vec<Token<'_>> = tokenize(source)
        .into_iter()
        .filter(|t| !t.is_trivia())
        .collect();
    let mut cur = Cursor::new(&tokens);

    cur.skip_separators();
    match cur.peek_kind() {
        Some(TokenKind::ClassdefKw) => parse_classdef(file_stem, &mut cur),
        Some(TokenKind::FunctionKw) => parse_function_file(file_stem, &mut cur),
        _ => Ok(parse_script(file_stem, &mut cur)),
    }
}

// =============================================================================
// TOKEN CURSOR
// =============================================================================

struct Cursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<&Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn prev_kind(&self) -> Option<TokenKind> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip newlines, semicolons and commas between statements.
    fn skip_separators(&mut self) {
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Newline | TokenKind::Semi | TokenKind::Comma)
        ) {
            self.pos += 1;
        }
    }

    /// Advance past the rest of the current line, including its newline.
    fn skip_line(&mut self) {
        while let Some(token) = self.bump() {
            if token.kind == TokenKind::Newline {
                break;
            }
        }
    }

    /// Advance past the rest of the current statement: stops after a
    /// newline, semicolon or comma at grouping depth zero.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Newline | TokenKind::Semi | TokenKind::Comma if depth == 0 => break,
                _ => {}
            }
        }
    }

    /// Consume a balanced group. The caller must be positioned at the
    /// opening token.
    fn skip_balanced(&mut self) -> Result<(), ParseFailure> {
        debug_assert!(matches!(
            self.peek_kind(),
            Some(TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
        ));
        let mut depth = 0usize;
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(ParseFailure::UnexpectedEof {
            context: "bracketed group",
        })
    }

    fn expect_range(&self) -> text_size::TextRange {
        match self.peek() {
            Some(token) => {
                let len = text_size::TextSize::of(token.text);
                text_size::TextRange::at(token.offset, len)
            }
            None => text_size::TextRange::empty(
                self.tokens
                    .last()
                    .map(|t| t.offset + text_size::TextSize::of(t.text))
                    .unwrap_or_default(),
            ),
        }
    }
}

// =============================================================================
// NAME & ATTRIBUTE PARSING
// =============================================================================

/// Parse a possibly dotted identifier such as `shape` or `set.radius`.
fn parse_dotted_name(cur: &mut Cursor<'_, '_>) -> Result<SmolStr, ParseFailure> {
    if !cur.at(TokenKind::Ident) {
        return Err(ParseFailure::Unexpected {
            expected: "identifier",
            at: cur.expect_range(),
        });
    }
    let mut name = String::from(cur.bump().map(|t| t.text).unwrap_or_default());
    while cur.at(TokenKind::Dot) && cur.nth_kind(1) == Some(TokenKind::Ident) {
        cur.bump();
        name.push('.');
        if let Some(token) = cur.bump() {
            name.push_str(token.text);
        }
    }
    Ok(SmolStr::from(name))
}

/// A parsed `(Name, Name = value, ...)` attribute list.
type AttrList = Vec<(SmolStr, Option<SmolStr>)>;

/// Parse an attribute list following a classdef or block keyword.
///
/// Values that are not plain identifiers (metaclass lists, cell arrays)
/// are skipped and recorded as `None`; they never mean `public`.
fn parse_attrs(cur: &mut Cursor<'_, '_>) -> Result<AttrList, ParseFailure> {
    let mut attrs = AttrList::new();
    if !cur.eat(TokenKind::LParen) {
        return Ok(attrs);
    }
    loop {
        match cur.peek_kind() {
            Some(TokenKind::RParen) => {
                cur.bump();
                return Ok(attrs);
            }
            Some(TokenKind::Comma) => {
                cur.bump();
            }
            Some(TokenKind::Ident) => {
                let name = SmolStr::from(cur.bump().map(|t| t.text).unwrap_or_default());
                let value = if cur.eat(TokenKind::Eq) {
                    match cur.peek_kind() {
                        Some(TokenKind::Ident) => {
                            Some(SmolStr::from(cur.bump().map(|t| t.text).unwrap_or_default()))
                        }
                        Some(TokenKind::LBrace) => {
                            cur.skip_balanced()?;
                            None
                        }
                        Some(_) => {
                            cur.bump();
                            None
                        }
                        None => None,
                    }
                } else {
                    None
                };
                attrs.push((name, value));
            }
            Some(_) => {
                cur.bump();
            }
            None => {
                return Err(ParseFailure::UnexpectedEof {
                    context: "attribute list",
                });
            }
        }
    }
}

/// Derive member visibility from an attribute list.
///
/// Checks `Access` first, then the read-side attribute, matching how the
/// runtime decides whether a member is externally reachable.
fn visibility_from(attrs: &AttrList, read_attr: &str) -> Visibility {
    for key in ["Access", read_attr] {
        if let Some((_, value)) = attrs.iter().find(|(name, _)| name == key) {
            return match value.as_deref() {
                Some(v) if v.eq_ignore_ascii_case("public") => Visibility::Public,
                _ => Visibility::Private,
            };
        }
    }
    Visibility::Public
}

// =============================================================================
// CLASSDEF FILES
// =============================================================================

fn parse_classdef(
    file_stem: &str,
    cur: &mut Cursor<'_, '_>,
) -> Result<FileSkeleton, ParseFailure> {
    cur.bump(); // classdef
    if cur.at(TokenKind::LParen) {
        cur.skip_balanced()?;
    }
    let declared_name = parse_dotted_name(cur)?;

    let mut superclasses = Vec::new();
    if cur.eat(TokenKind::Lt) {
        loop {
            superclasses.push(parse_dotted_name(cur)?);
            if !cur.eat(TokenKind::Amp) {
                break;
            }
        }
    }
    cur.skip_line();

    let mut members = Vec::new();
    loop {
        cur.skip_separators();
        match cur.peek_kind() {
            Some(TokenKind::PropertiesKw) => parse_properties_block(cur, &mut members)?,
            Some(TokenKind::MethodsKw) => parse_methods_block(cur, &mut members)?,
            Some(TokenKind::EventsKw | TokenKind::EnumerationKw) => skip_simple_block(cur)?,
            Some(TokenKind::EndKw) => {
                cur.bump();
                break;
            }
            Some(_) => cur.skip_line(),
            None => {
                return Err(ParseFailure::UnexpectedEof {
                    context: "classdef body",
                });
            }
        }
    }

    Ok(FileSkeleton {
        name: SmolStr::from(file_stem),
        declared_name: Some(declared_name),
        kind: FileKind::Classdef,
        superclasses,
        members,
        local_functions: Vec::new(),
    })
}

fn parse_properties_block(
    cur: &mut Cursor<'_, '_>,
    members: &mut Vec<Member>,
) -> Result<(), ParseFailure> {
    cur.bump(); // properties
    let attrs = parse_attrs(cur)?;
    let visibility = visibility_from(&attrs, "GetAccess");

    loop {
        cur.skip_separators();
        match cur.peek_kind() {
            Some(TokenKind::EndKw) => {
                cur.bump();
                return Ok(());
            }
            Some(TokenKind::Ident) => {
                let name = SmolStr::from(cur.bump().map(|t| t.text).unwrap_or_default());
                members.push(Member::new(name, MemberKind::Property, visibility));
                // Size/type/validator annotations and default values are
                // opaque; skip to the end of the statement.
                cur.skip_statement();
            }
            Some(_) => cur.skip_line(),
            None => {
                return Err(ParseFailure::UnexpectedEof {
                    context: "properties block",
                });
            }
        }
    }
}

fn parse_methods_block(
    cur: &mut Cursor<'_, '_>,
    members: &mut Vec<Member>,
) -> Result<(), ParseFailure> {
    cur.bump(); // methods
    let attrs = parse_attrs(cur)?;
    let visibility = visibility_from(&attrs, "Access");

    loop {
        cur.skip_separators();
        match cur.peek_kind() {
            Some(TokenKind::EndKw) => {
                cur.bump();
                return Ok(());
            }
            Some(TokenKind::FunctionKw) => {
                cur.bump();
                let name = parse_signature(cur)?;
                members.push(Member::new(name, MemberKind::Method, visibility));
                cur.skip_statement();
                skip_function_body(cur)?;
            }
            // Abstract method signatures have no `function` keyword.
            Some(TokenKind::Ident | TokenKind::LBracket) => {
                let name = parse_signature(cur)?;
                members.push(Member::new(name, MemberKind::Method, visibility));
                cur.skip_statement();
            }
            Some(_) => cur.skip_line(),
            None => {
                return Err(ParseFailure::UnexpectedEof {
                    context: "methods block",
                });
            }
        }
    }
}

/// Skip an events or enumeration block. Their entries never open nested
/// `end` blocks, so the first statement-level `end` closes the block.
fn skip_simple_block(cur: &mut Cursor<'_, '_>) -> Result<(), ParseFailure> {
    let context = match cur.peek_kind() {
        Some(TokenKind::EventsKw) => "events block",
        _ => "enumeration block",
    };
    cur.bump();
    if cur.at(TokenKind::LParen) {
        cur.skip_balanced()?;
    }
    let mut depth = 0usize;
    while let Some(token) = cur.bump() {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                depth = depth.saturating_sub(1);
            }
            TokenKind::EndKw if depth == 0 => return Ok(()),
            _ => {}
        }
    }
    Err(ParseFailure::UnexpectedEof { context })
}

/// Parse a function signature (after any `function` keyword) and return
/// the declared, possibly dotted, name.
///
/// Handles `name`, `name(args)`, `out = name(args)`,
/// `[a, b] = name(args)` and accessor forms like `set.radius`.
fn parse_signature(cur: &mut Cursor<'_, '_>) -> Result<SmolStr, ParseFailure> {
    if cur.at(TokenKind::LBracket) {
        cur.skip_balanced()?;
        if !cur.eat(TokenKind::Eq) {
            return Err(ParseFailure::Unexpected {
                expected: "`=` after output list",
                at: cur.expect_range(),
            });
        }
        return parse_dotted_name(cur);
    }

    let first = parse_dotted_name(cur)?;
    if cur.eat(TokenKind::Eq) {
        parse_dotted_name(cur)
    } else {
        Ok(first)
    }
}

/// Skip an end-terminated function body, as required inside classdef
/// methods blocks. Tracks grouping depth so `x(end)` style indexing and
/// `s.end`-like accesses never close the body.
fn skip_function_body(cur: &mut Cursor<'_, '_>) -> Result<(), ParseFailure> {
    let mut depth = 1usize;
    let mut group = 0usize;
    let mut stmt_start = true;
    loop {
        let prev = cur.prev_kind();
        let Some(token) = cur.bump() else {
            return Err(ParseFailure::UnexpectedEof {
                context: "function body",
            });
        };
        let kind = token.kind;
        match kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => group += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                group = group.saturating_sub(1);
            }
            TokenKind::FunctionKw | TokenKind::BlockKw if group == 0 => depth += 1,
            // `arguments` is not reserved; only a bare header opens a block.
            TokenKind::ArgumentsKw
                if group == 0
                    && stmt_start
                    && matches!(
                        cur.peek_kind(),
                        Some(TokenKind::Newline | TokenKind::Semi | TokenKind::LParen) | None
                    ) =>
            {
                if cur.at(TokenKind::LParen) {
                    cur.skip_balanced()?;
                }
                depth += 1;
            }
            TokenKind::EndKw if group == 0 && prev != Some(TokenKind::Dot) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            _ => {}
        }
        stmt_start = matches!(
            kind,
            TokenKind::Newline | TokenKind::Semi | TokenKind::Comma
        );
    }
}

// =============================================================================
// FUNCTION FILES & SCRIPTS
// =============================================================================

fn parse_function_file(
    file_stem: &str,
    cur: &mut Cursor<'_, '_>,
) -> Result<FileSkeleton, ParseFailure> {
    cur.bump(); // function
    let declared_name = parse_signature(cur)?;
    cur.skip_statement();

    let local_functions = collect_top_level_functions(cur)?;

    Ok(FileSkeleton {
        name: SmolStr::from(file_stem),
        declared_name: Some(declared_name),
        kind: FileKind::Function,
        superclasses: Vec::new(),
        members: Vec::new(),
        local_functions,
    })
}

fn parse_script(file_stem: &str, cur: &mut Cursor<'_, '_>) -> FileSkeleton {
    // Scripts may end with local functions; anything unparseable among
    // them is ignored rather than failing the whole file.
    let local_functions = collect_top_level_functions(cur).unwrap_or_default();

    FileSkeleton {
        name: SmolStr::from(file_stem),
        declared_name: None,
        kind: FileKind::Script,
        superclasses: Vec::new(),
        members: Vec::new(),
        local_functions,
    }
}

/// Collect the names of all remaining `function` declarations that appear
/// at statement start outside any grouping. The `end` keywords of the
/// enclosing functions are optional in function files, so declarations are
/// found by position rather than by block matching; nested functions are
/// recorded alongside local ones.
fn collect_top_level_functions(
    cur: &mut Cursor<'_, '_>,
) -> Result<Vec<SmolStr>, ParseFailure> {
    let mut names = Vec::new();
    let mut group = 0usize;
    let mut stmt_start = true;
    while let Some(kind) = cur.peek_kind() {
        match kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                group += 1;
                cur.bump();
            }
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                group = group.saturating_sub(1);
                cur.bump();
            }
            TokenKind::FunctionKw if group == 0 && stmt_start => {
                cur.bump();
                names.push(parse_signature(cur)?);
                cur.skip_statement();
                stmt_start = true;
                continue;
            }
            _ => {
                cur.bump();
            }
        }
        stmt_start = matches!(
            kind,
            TokenKind::Newline | TokenKind::Semi | TokenKind::Comma
        );
    }
    Ok(names)
}

#[cfg(test)]
mod tests;
