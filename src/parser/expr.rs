//! Expression parsing
//!
//! Holds the token cursor shared by all parse functions, plus the rules for
//! identifiers, numbers, constants and call argument expressions.

use crate::ast::*;
use crate::error::{Error, Result};
use crate::parser::lexer::{unescape_string, unquote_identifier, Token, TokenKind};

static EOF: Token = Token {
    kind: TokenKind::Eof,
    text: String::new(),
    span: Span {
        start: 0,
        end: 0,
        line: 1,
        column: 1,
    },
};

/// Cursor over a token stream that ends in [`TokenKind::Eof`]
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Token at the cursor
    pub fn current(&self) -> &'a Token {
        self.peek(0)
    }

    /// Token `n` positions ahead of the cursor; past the end this is the final token
    pub fn peek(&self, n: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        tokens
            .get(self.pos + n)
            .or_else(|| tokens.last())
            .unwrap_or(&EOF)
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    /// Move past the current token and return it
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Advance if the current token has the given kind
    pub fn consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance past a token of the given kind or fail
    pub fn expect(&mut self, kind: TokenKind) -> Result<&'a Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(kind.to_string()))
        }
    }

    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Span of the most recently consumed token
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span,
            None => self.current().span,
        }
    }

    /// Span from `start` to the end of the most recently consumed token
    pub fn span_from(&self, start: Span) -> Span {
        start.to(self.previous_span())
    }

    /// Syntax error at the current token
    pub fn error(&self, expected: impl Into<String>) -> Error {
        let token = self.current();
        Error::ParseError {
            expected: expected.into(),
            found: token.describe(),
            offset: token.span.start,
            line: token.span.line,
            column: token.span.column,
            span: (token.span.start, token.span.len()),
        }
    }
}

/// Parse an identifier: plain, back-quoted, or a non-reserved keyword
pub fn parse_identifier(parser: &mut Parser) -> Result<Identifier> {
    let token = parser.current();
    match token.kind {
        TokenKind::Identifier => {
            parser.advance();
            Ok(Identifier {
                value: token.text.clone(),
                quoted: false,
                span: token.span,
            })
        }
        TokenKind::BackquotedIdentifier => {
            parser.advance();
            Ok(Identifier {
                value: unquote_identifier(&token.text),
                quoted: true,
                span: token.span,
            })
        }
        kind if kind.is_non_reserved() => {
            parser.advance();
            Ok(Identifier {
                value: token.text.clone(),
                quoted: false,
                span: token.span,
            })
        }
        _ => Err(parser.error("identifier")),
    }
}

/// Parse a dotted name such as `catalog.db.tbl`
pub fn parse_multipart_identifier(parser: &mut Parser) -> Result<MultipartIdentifier> {
    let first = parse_identifier(parser)?;
    let start = first.span;
    let mut parts = vec![first];
    while parser.consume(TokenKind::Dot) {
        parts.push(parse_identifier(parser)?);
    }
    Ok(MultipartIdentifier {
        parts,
        span: parser.span_from(start),
    })
}

/// Parse a numeric literal with an optional leading `-`
pub fn parse_number(parser: &mut Parser) -> Result<Number> {
    let start = parser.current().span;
    let negative = parser.consume(TokenKind::Minus);

    let token = parser.current();
    let kind = match token.kind {
        TokenKind::ExponentValue => NumberKind::Exponent,
        TokenKind::DecimalValue => NumberKind::Decimal,
        TokenKind::IntegerValue => NumberKind::Integer,
        TokenKind::BigIntLiteral => NumberKind::BigInt,
        TokenKind::SmallIntLiteral => NumberKind::SmallInt,
        TokenKind::TinyIntLiteral => NumberKind::TinyInt,
        TokenKind::DoubleLiteral => NumberKind::Double,
        TokenKind::FloatLiteral => NumberKind::Float,
        TokenKind::BigDecimalLiteral => NumberKind::BigDecimal,
        _ => return Err(parser.error("number")),
    };
    parser.advance();

    Ok(Number {
        kind,
        text: token.text.clone(),
        negative,
        span: parser.span_from(start),
    })
}

/// Parse a constant
///
/// Tried in order: number, type constructor (identifier followed by a
/// string), boolean, one or more adjacent strings.
pub fn parse_constant(parser: &mut Parser) -> Result<Constant> {
    let kind = parser.kind();

    if kind == TokenKind::Minus || kind.is_number() {
        return parse_number(parser).map(Constant::Number);
    }

    if kind.can_be_identifier() && parser.peek_kind(1) == TokenKind::String {
        let type_name = parse_identifier(parser)?;
        let token = parser.expect(TokenKind::String)?;
        return Ok(Constant::TypeConstructor {
            span: type_name.span.to(token.span),
            type_name,
            value: unescape_string(&token.text),
        });
    }

    if kind == TokenKind::True || kind == TokenKind::False {
        let token = parser.advance();
        return Ok(Constant::Boolean {
            value: kind == TokenKind::True,
            span: token.span,
        });
    }

    if kind == TokenKind::String {
        let start = parser.current().span;
        let mut value = String::new();
        while parser.check(TokenKind::String) {
            value.push_str(&unescape_string(&parser.advance().text));
        }
        return Ok(Constant::StringLiteral {
            value,
            span: parser.span_from(start),
        });
    }

    Err(parser.error("constant"))
}

/// Parse a call argument value: a constant or a `MAP(...)` literal
pub fn parse_expression(parser: &mut Parser) -> Result<Expression> {
    if parser.check(TokenKind::Map) && parser.peek_kind(1) == TokenKind::LParen {
        return parse_string_map(parser);
    }
    parse_constant(parser).map(Expression::Constant)
}

fn parse_string_map(parser: &mut Parser) -> Result<Expression> {
    let start = parser.expect(TokenKind::Map)?.span;
    parser.expect(TokenKind::LParen)?;

    let mut entries = vec![parse_constant(parser)?];
    while parser.consume(TokenKind::Comma) {
        entries.push(parse_constant(parser)?);
    }
    if !parser.check(TokenKind::RParen) {
        return Err(parser.error("',' or ')'"));
    }
    parser.advance();

    Ok(Expression::StringMap {
        entries,
        span: parser.span_from(start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn with_parser<T>(input: &str, f: impl FnOnce(&mut Parser) -> Result<T>) -> Result<T> {
        let tokens = tokenize(input)?;
        let mut parser = Parser::new(&tokens);
        f(&mut parser)
    }

    #[test]
    fn test_peek_past_end_returns_eof() {
        let tokens = tokenize("t").unwrap();
        let parser = Parser::new(&tokens);
        assert_eq!(parser.peek_kind(5), TokenKind::Eof);
    }

    #[test]
    fn test_parser_over_empty_slice() {
        let mut parser = Parser::new(&[]);
        assert!(parser.is_eof());
        assert!(parser.expect(TokenKind::Show).is_err());
    }

    #[test]
    fn test_parse_negative_number() {
        let number = with_parser("-42L", parse_number).unwrap();
        assert!(number.negative);
        assert_eq!(number.kind, NumberKind::BigInt);
        assert_eq!(number.text, "42L");
        assert_eq!((number.span.start, number.span.end), (0, 4));
    }

    #[test]
    fn test_minus_without_number() {
        let err = with_parser("-'x'", parse_number).unwrap_err();
        assert!(matches!(err, Error::ParseError { offset: 1, .. }));
    }

    #[test]
    fn test_multipart_identifier_span() {
        let name = with_parser("cat . db.`t x`", parse_multipart_identifier).unwrap();
        assert_eq!(name.names(), vec!["cat", "db", "t x"]);
        assert_eq!((name.span.start, name.span.end), (0, 14));
    }

    #[test]
    fn test_reserved_keyword_is_not_identifier() {
        assert!(with_parser("TAGS", parse_identifier).is_err());
        assert!(with_parser("SHOW", parse_identifier).is_err());
    }

    #[test]
    fn test_true_followed_by_string_is_type_constructor() {
        let constant = with_parser("TRUE 'x'", parse_constant).unwrap();
        assert!(matches!(constant, Constant::TypeConstructor { ref value, .. } if value == "x"));
    }

    #[test]
    fn test_map_without_paren_is_type_constructor() {
        let expr = with_parser("map 'k'", parse_expression).unwrap();
        assert!(matches!(expr, Expression::Constant(Constant::TypeConstructor { .. })));
    }
}
