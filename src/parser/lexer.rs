//! SQL tokenization
//!
//! This module breaks statement text into tokens. Whitespace and comments are
//! produced as hidden tokens and filtered out of the stream the parser sees.
//!
//! Tokenization is maximal munch: every rule that matches at the current
//! position is measured and the longest wins. Ties go to keywords, then the
//! numeric literal families, then plain identifiers. Two rules carry a
//! one-character lookahead predicate:
//!
//! - a literal containing a decimal point is only valid when the next
//!   character is not an ASCII letter, digit or underscore
//! - `/*` only opens a comment when it is not followed by `+` (an optimizer
//!   hint)

use std::fmt;

use crate::error::{Error, Result};

/// Token types for the extension dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Alter,
    As,
    Call,
    Create,
    Days,
    Delete,
    Exists,
    False,
    Hours,
    If,
    Map,
    Minutes,
    Not,
    Of,
    Or,
    Rename,
    Replace,
    Retain,
    Show,
    Table,
    Tag,
    Tags,
    To,
    True,
    Version,

    // Operators
    Plus,
    Minus,

    // Punctuation
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Arrow, // =>

    // Literals
    String,
    BigIntLiteral,
    SmallIntLiteral,
    TinyIntLiteral,
    IntegerValue,
    ExponentValue,
    DecimalValue,
    FloatLiteral,
    DoubleLiteral,
    BigDecimalLiteral,

    // Identifiers
    Identifier,
    BackquotedIdentifier,

    // Hidden channel
    Whitespace,
    LineComment,
    BlockComment,

    // Special
    Unrecognized,
    Eof,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("ALTER", TokenKind::Alter),
    ("AS", TokenKind::As),
    ("CALL", TokenKind::Call),
    ("CREATE", TokenKind::Create),
    ("DAYS", TokenKind::Days),
    ("DELETE", TokenKind::Delete),
    ("EXISTS", TokenKind::Exists),
    ("FALSE", TokenKind::False),
    ("HOURS", TokenKind::Hours),
    ("IF", TokenKind::If),
    ("MAP", TokenKind::Map),
    ("MINUTES", TokenKind::Minutes),
    ("NOT", TokenKind::Not),
    ("OF", TokenKind::Of),
    ("OR", TokenKind::Or),
    ("RENAME", TokenKind::Rename),
    ("REPLACE", TokenKind::Replace),
    ("RETAIN", TokenKind::Retain),
    ("SHOW", TokenKind::Show),
    ("TABLE", TokenKind::Table),
    ("TAG", TokenKind::Tag),
    ("TAGS", TokenKind::Tags),
    ("TO", TokenKind::To),
    ("TRUE", TokenKind::True),
    ("VERSION", TokenKind::Version),
];

impl TokenKind {
    /// Look up a keyword, ignoring case
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map(|(_, kind)| *kind)
    }

    /// Canonical spelling of a keyword token
    pub fn keyword_text(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword_text().is_some()
    }

    /// Keywords that may also be used wherever an identifier is expected
    pub fn is_non_reserved(&self) -> bool {
        matches!(
            self,
            TokenKind::Alter
                | TokenKind::As
                | TokenKind::Call
                | TokenKind::Create
                | TokenKind::Days
                | TokenKind::Delete
                | TokenKind::Exists
                | TokenKind::Hours
                | TokenKind::If
                | TokenKind::Not
                | TokenKind::Of
                | TokenKind::Or
                | TokenKind::Table
                | TokenKind::Replace
                | TokenKind::Retain
                | TokenKind::Version
                | TokenKind::Tag
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Map
        )
    }

    /// Whether a token of this kind can stand in an identifier slot
    pub fn can_be_identifier(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::BackquotedIdentifier) || self.is_non_reserved()
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            TokenKind::BigIntLiteral
                | TokenKind::SmallIntLiteral
                | TokenKind::TinyIntLiteral
                | TokenKind::IntegerValue
                | TokenKind::ExponentValue
                | TokenKind::DecimalValue
                | TokenKind::FloatLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::BigDecimalLiteral
        )
    }

    /// Whitespace and comments never reach the parser
    pub fn is_hidden(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Alter
            | TokenKind::As
            | TokenKind::Call
            | TokenKind::Create
            | TokenKind::Days
            | TokenKind::Delete
            | TokenKind::Exists
            | TokenKind::False
            | TokenKind::Hours
            | TokenKind::If
            | TokenKind::Map
            | TokenKind::Minutes
            | TokenKind::Not
            | TokenKind::Of
            | TokenKind::Or
            | TokenKind::Rename
            | TokenKind::Replace
            | TokenKind::Retain
            | TokenKind::Show
            | TokenKind::Table
            | TokenKind::Tag
            | TokenKind::Tags
            | TokenKind::To
            | TokenKind::True
            | TokenKind::Version => self.keyword_text().unwrap_or("keyword"),
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Semicolon => "';'",
            TokenKind::Arrow => "'=>'",
            TokenKind::String => "string literal",
            TokenKind::BigIntLiteral => "bigint literal",
            TokenKind::SmallIntLiteral => "smallint literal",
            TokenKind::TinyIntLiteral => "tinyint literal",
            TokenKind::IntegerValue => "integer literal",
            TokenKind::ExponentValue => "exponent literal",
            TokenKind::DecimalValue => "decimal literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::DoubleLiteral => "double literal",
            TokenKind::BigDecimalLiteral => "bigdecimal literal",
            TokenKind::Identifier => "identifier",
            TokenKind::BackquotedIdentifier => "back-quoted identifier",
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineComment => "comment",
            TokenKind::BlockComment => "block comment",
            TokenKind::Unrecognized => "unrecognized character",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// Location of a token or node in the statement text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character, counted in characters
    pub column: usize,
}

impl Span {
    /// Span from the start of `self` to the end of `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A classified piece of the input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact matched text
    pub text: String,
    pub span: Span,
}

impl Token {
    /// How the token is named in parse errors
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Unrecognized => format!("unrecognized character '{}'", self.text),
            TokenKind::String => format!("string {}", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Tokenize a statement, dropping whitespace and comments
///
/// The returned stream always ends with a single [`TokenKind::Eof`] token.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        if token.kind.is_hidden() {
            continue;
        }
        tracing::trace!(kind = ?token.kind, text = %token.text, offset = token.span.start, "token");
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Tokenize a statement, keeping whitespace and comment tokens
pub fn tokenize_with_hidden(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Hand-written scanner over the statement bytes
///
/// All syntax is ASCII, so scanning works on bytes. Multi-byte characters
/// only ever appear inside quoted regions or as unrecognized tokens, and
/// their continuation bytes can never be mistaken for ASCII syntax.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    /// Start of the last `*/` in the input; no comment can close past it
    last_close: Option<usize>,
    /// Every opener seen by a scan from offset 0, with its balanced end
    comment_pairs: Vec<(usize, Option<usize>)>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            last_close: input.rfind("*/"),
            comment_pairs: match_comments(input.as_bytes()),
        }
    }

    /// Produce the next token, hidden ones included
    pub fn next_token(&mut self) -> Result<Token> {
        let Some(&b) = self.bytes.get(self.pos) else {
            return Ok(self.emit(TokenKind::Eof, 0));
        };

        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                let len = self.run_len(self.pos, |c| matches!(c, b' ' | b'\t' | b'\r' | b'\n'));
                Ok(self.emit(TokenKind::Whitespace, len))
            }
            b'-' if self.byte_at(self.pos + 1) == Some(b'-') => {
                let len = self.line_comment_len();
                Ok(self.emit(TokenKind::LineComment, len))
            }
            b'/' if opens_comment(self.bytes, self.pos) => match self.block_comment_end(self.pos) {
                Some(end) => Ok(self.emit(TokenKind::BlockComment, end - self.pos)),
                None => Ok(self.emit(TokenKind::Unrecognized, 1)),
            },
            b'\'' | b'"' => {
                let len = self.quoted_len(b)?;
                Ok(self.emit(TokenKind::String, len))
            }
            b'`' => {
                let len = self.backquoted_len()?;
                Ok(self.emit(TokenKind::BackquotedIdentifier, len))
            }
            b'(' => Ok(self.emit(TokenKind::LParen, 1)),
            b')' => Ok(self.emit(TokenKind::RParen, 1)),
            b',' => Ok(self.emit(TokenKind::Comma, 1)),
            b';' => Ok(self.emit(TokenKind::Semicolon, 1)),
            b'+' => Ok(self.emit(TokenKind::Plus, 1)),
            b'-' => Ok(self.emit(TokenKind::Minus, 1)),
            b'=' if self.byte_at(self.pos + 1) == Some(b'>') => Ok(self.emit(TokenKind::Arrow, 2)),
            b'.' => match self.scan_number(self.pos) {
                Some((len, kind)) => Ok(self.emit(kind, len)),
                None => Ok(self.emit(TokenKind::Dot, 1)),
            },
            c if is_word_byte(c) => Ok(self.word_or_number()),
            _ => {
                let len = self.input[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                Ok(self.emit(TokenKind::Unrecognized, len))
            }
        }
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    fn run_len(&self, start: usize, pred: impl Fn(u8) -> bool) -> usize {
        self.bytes[start..].iter().take_while(|&&c| pred(c)).count()
    }

    /// Build a token of `len` bytes at the cursor and move past it
    fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.pos;
        let end = start + len;
        let text = &self.input[start..end];
        let span = Span {
            start,
            end,
            line: self.line,
            column: self.column,
        };
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
        Token {
            kind,
            text: text.to_string(),
            span,
        }
    }

    /// `--` up to and including the line break; `\` before a newline continues the comment
    fn line_comment_len(&self) -> usize {
        let mut i = self.pos + 2;
        while let Some(c) = self.byte_at(i) {
            if c == b'\\' && self.byte_at(i + 1) == Some(b'\n') {
                i += 2;
            } else if c == b'\r' || c == b'\n' {
                break;
            } else {
                i += 1;
            }
        }
        if self.byte_at(i) == Some(b'\r') {
            i += 1;
        }
        if self.byte_at(i) == Some(b'\n') {
            i += 1;
        }
        i - self.pos
    }

    /// End offset of the bracketed comment opened at `start`
    ///
    /// Nested comments are matched by depth. When the nesting never balances,
    /// the inner openers are treated as plain text and the first `*/` closes
    /// the comment. `None` means the comment is unterminated.
    fn block_comment_end(&self, start: usize) -> Option<usize> {
        match self.last_close {
            Some(close) if close >= start + 2 => {}
            _ => return None,
        }
        let balanced = match self
            .comment_pairs
            .binary_search_by_key(&start, |&(open, _)| open)
        {
            Ok(index) => self.comment_pairs[index].1,
            Err(_) => nested_comment_end(self.bytes, start),
        };
        balanced.or_else(|| {
            self.input[start + 2..]
                .find("*/")
                .map(|offset| start + 2 + offset + 2)
        })
    }

    /// Length of a single- or double-quoted string, quotes included
    fn quoted_len(&self, quote: u8) -> Result<usize> {
        let mut i = self.pos + 1;
        loop {
            match self.byte_at(i) {
                None => return Err(self.unterminated("unterminated string literal", quote)),
                Some(b'\\') => {
                    if self.byte_at(i + 1).is_none() {
                        return Err(self.unterminated("unterminated string literal", quote));
                    }
                    i += 2;
                }
                Some(c) if c == quote => return Ok(i + 1 - self.pos),
                Some(_) => i += 1,
            }
        }
    }

    /// Length of a back-quoted identifier; a doubled back-tick stays inside
    fn backquoted_len(&self) -> Result<usize> {
        let mut i = self.pos + 1;
        loop {
            match self.byte_at(i) {
                None => return Err(self.unterminated("unterminated back-quoted identifier", b'`')),
                Some(b'`') if self.byte_at(i + 1) == Some(b'`') => i += 2,
                Some(b'`') => return Ok(i + 1 - self.pos),
                Some(_) => i += 1,
            }
        }
    }

    fn unterminated(&self, message: &str, quote: u8) -> Error {
        Error::LexError {
            message: message.to_string(),
            unexpected: char::from(quote),
            offset: self.pos,
            line: self.line,
            column: self.column,
            span: (self.pos, self.bytes.len() - self.pos),
        }
    }

    /// Identifier, keyword or numeric literal starting with a word character
    fn word_or_number(&mut self) -> Token {
        let word_len = self.run_len(self.pos, is_word_byte);
        if let Some((len, kind)) = self.scan_number(self.pos) {
            if len >= word_len {
                return self.emit(kind, len);
            }
        }

        let word = &self.input[self.pos..self.pos + word_len];
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
        self.emit(kind, word_len)
    }

    /// Longest numeric literal starting at `start`, if any
    ///
    /// Candidates are offered in rule priority order and only a strictly
    /// longer candidate replaces the current best.
    fn scan_number(&self, start: usize) -> Option<(usize, TokenKind)> {
        let mut best: Option<(usize, TokenKind)> = None;

        let digits = self.run_len(start, |c| c.is_ascii_digit());

        if digits > 0 {
            let end = start + digits;
            match self.byte_at(end) {
                Some(b'L') => offer(&mut best, digits + 1, TokenKind::BigIntLiteral),
                Some(b'S') => offer(&mut best, digits + 1, TokenKind::SmallIntLiteral),
                Some(b'Y') => offer(&mut best, digits + 1, TokenKind::TinyIntLiteral),
                _ => {}
            }
            offer(&mut best, digits, TokenKind::IntegerValue);

            let exponent = self.exponent_len(end);
            if exponent > 0 {
                offer(&mut best, digits + exponent, TokenKind::ExponentValue);
            }
            if let Some((suffix, kind)) = self.float_suffix(end + exponent) {
                offer(&mut best, digits + exponent + suffix, kind);
            }
        }

        let decimal = if digits > 0 && self.byte_at(start + digits) == Some(b'.') {
            digits + 1 + self.run_len(start + digits + 1, |c| c.is_ascii_digit())
        } else if digits == 0 && self.byte_at(start) == Some(b'.') {
            let fraction = self.run_len(start + 1, |c| c.is_ascii_digit());
            if fraction == 0 {
                return best;
            }
            1 + fraction
        } else {
            return best;
        };

        let end = start + decimal;
        if self.is_valid_decimal(end) {
            offer(&mut best, decimal, TokenKind::DecimalValue);
        }
        let exponent = self.exponent_len(end);
        if exponent > 0 && self.is_valid_decimal(end + exponent) {
            offer(&mut best, decimal + exponent, TokenKind::ExponentValue);
        }
        if let Some((suffix, kind)) = self.float_suffix(end + exponent) {
            if self.is_valid_decimal(end + exponent + suffix) {
                offer(&mut best, decimal + exponent + suffix, kind);
            }
        }

        best
    }

    /// `E[+-]?digits` at `at`, or 0
    fn exponent_len(&self, at: usize) -> usize {
        if self.byte_at(at) != Some(b'E') {
            return 0;
        }
        let sign = usize::from(matches!(self.byte_at(at + 1), Some(b'+') | Some(b'-')));
        let digits = self.run_len(at + 1 + sign, |c| c.is_ascii_digit());
        if digits == 0 {
            0
        } else {
            1 + sign + digits
        }
    }

    /// `F`, `D` or `BD` at `at`
    fn float_suffix(&self, at: usize) -> Option<(usize, TokenKind)> {
        match self.byte_at(at) {
            Some(b'F') => Some((1, TokenKind::FloatLiteral)),
            Some(b'D') => Some((1, TokenKind::DoubleLiteral)),
            Some(b'B') if self.byte_at(at + 1) == Some(b'D') => Some((2, TokenKind::BigDecimalLiteral)),
            _ => None,
        }
    }

    /// A decimal-like literal ending before `at` must not run into a word character
    fn is_valid_decimal(&self, at: usize) -> bool {
        !matches!(self.byte_at(at), Some(c) if is_word_byte(c))
    }
}

/// `/*` not followed by `+`
fn opens_comment(bytes: &[u8], at: usize) -> bool {
    bytes.get(at) == Some(&b'/') && bytes.get(at + 1) == Some(&b'*') && bytes.get(at + 2) != Some(&b'+')
}

fn closes_comment(bytes: &[u8], at: usize) -> bool {
    bytes.get(at) == Some(&b'*') && bytes.get(at + 1) == Some(&b'/')
}

/// End offset of the comment opened at `start` once its nesting depth returns to zero
fn nested_comment_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        if opens_comment(bytes, i) {
            depth += 1;
            i += 2;
        } else if closes_comment(bytes, i) {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return Some(i);
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Pair openers and closers in a single pass from offset 0
///
/// A depth scan started at any opener this pass visits walks the same
/// openers and closers, so its result is the stack match recorded here.
/// Openers left on the stack never balance.
fn match_comments(bytes: &[u8]) -> Vec<(usize, Option<usize>)> {
    let mut pairs = Vec::new();
    let mut open = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if opens_comment(bytes, i) {
            open.push(pairs.len());
            pairs.push((i, None));
            i += 2;
        } else if closes_comment(bytes, i) {
            if let Some(index) = open.pop() {
                pairs[index].1 = Some(i + 2);
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    pairs
}

fn offer(best: &mut Option<(usize, TokenKind)>, len: usize, kind: TokenKind) {
    if best.map_or(true, |(best_len, _)| len > best_len) {
        *best = Some((len, kind));
    }
}

fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Strip the quotes from a string token and resolve its escapes
///
/// `\%` and `\_` keep their backslash so LIKE patterns survive.
pub fn unescape_string(raw: &str) -> String {
    let inner = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" };
    let chars: Vec<char> = inner.chars().collect();
    let mut out = String::with_capacity(inner.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 >= chars.len() {
            out.push(c);
            i += 1;
            continue;
        }

        let next = chars[i + 1];
        if next == 'u' && i + 6 <= chars.len() && chars[i + 2..i + 6].iter().all(|c| c.is_ascii_hexdigit()) {
            let code = chars[i + 2..i + 6]
                .iter()
                .fold(0u32, |acc, c| acc * 16 + c.to_digit(16).unwrap_or(0));
            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            i += 6;
            continue;
        }

        if i + 4 <= chars.len()
            && matches!(chars[i + 1], '0'..='1')
            && matches!(chars[i + 2], '0'..='7')
            && matches!(chars[i + 3], '0'..='7')
        {
            let code = chars[i + 1..i + 4]
                .iter()
                .fold(0u32, |acc, c| acc * 8 + c.to_digit(8).unwrap_or(0));
            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            i += 4;
            continue;
        }

        match next {
            '0' => out.push('\0'),
            'b' => out.push('\u{8}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'Z' => out.push('\u{1A}'),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
        i += 2;
    }

    out
}

/// Strip the back-ticks from a back-quoted identifier and collapse doubled ones
pub fn unquote_identifier(raw: &str) -> String {
    let inner = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" };
    inner.replace("``", "`")
}
