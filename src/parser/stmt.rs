//! Statement parsing
//!
//! Parses CALL, SHOW TAGS and the ALTER TABLE tag statements.

use crate::ast::*;
use crate::parser::expr::{parse_expression, parse_identifier, parse_multipart_identifier, parse_number, Parser};
use crate::parser::lexer::TokenKind;
use crate::Result;

/// Parse a statement from tokens
pub fn parse_statement(parser: &mut Parser) -> Result<Statement> {
    match parser.kind() {
        TokenKind::Call => parse_call_statement(parser).map(Statement::Call),
        TokenKind::Show => parse_show_tags_statement(parser).map(Statement::ShowTags),
        TokenKind::Alter => parse_alter_statement(parser),
        _ => Err(parser.error("CALL, SHOW or ALTER")),
    }
}

/// Parse CALL statement
fn parse_call_statement(parser: &mut Parser) -> Result<CallStatement> {
    let start = parser.expect(TokenKind::Call)?.span;
    let procedure = parse_multipart_identifier(parser)?;
    parser.expect(TokenKind::LParen)?;

    let mut args = Vec::new();
    if !parser.consume(TokenKind::RParen) {
        args.push(parse_call_argument(parser)?);
        while parser.consume(TokenKind::Comma) {
            args.push(parse_call_argument(parser)?);
        }
        if !parser.consume(TokenKind::RParen) {
            return Err(parser.error("',' or ')'"));
        }
    }

    Ok(CallStatement {
        procedure,
        args,
        span: parser.span_from(start),
    })
}

/// Parse a positional or `name => value` argument
fn parse_call_argument(parser: &mut Parser) -> Result<CallArgument> {
    if parser.kind().can_be_identifier() && parser.peek_kind(1) == TokenKind::Arrow {
        let name = parse_identifier(parser)?;
        parser.expect(TokenKind::Arrow)?;
        let value = parse_expression(parser)?;
        return Ok(CallArgument::Named { name, value });
    }
    parse_expression(parser).map(CallArgument::Positional)
}

/// Parse SHOW TAGS statement
fn parse_show_tags_statement(parser: &mut Parser) -> Result<ShowTagsStatement> {
    let start = parser.expect(TokenKind::Show)?.span;
    parser.expect(TokenKind::Tags)?;
    let table = parse_multipart_identifier(parser)?;
    Ok(ShowTagsStatement {
        table,
        span: parser.span_from(start),
    })
}

/// Parse ALTER TABLE statement
fn parse_alter_statement(parser: &mut Parser) -> Result<Statement> {
    let start = parser.expect(TokenKind::Alter)?.span;
    parser.expect(TokenKind::Table)?;
    let table = parse_multipart_identifier(parser)?;

    match parser.kind() {
        TokenKind::Create | TokenKind::Replace => {
            let clause = parse_tag_clause(parser)?;
            Ok(Statement::CreateOrReplaceTag(CreateOrReplaceTagStatement {
                table,
                clause,
                span: parser.span_from(start),
            }))
        }
        TokenKind::Delete => {
            parser.advance();
            parser.expect(TokenKind::Tag)?;
            let if_exists = if parser.check(TokenKind::If) && parser.peek_kind(1) == TokenKind::Exists {
                parser.advance();
                parser.advance();
                true
            } else {
                false
            };
            let tag_name = parse_identifier(parser)?;
            Ok(Statement::DeleteTag(DeleteTagStatement {
                table,
                if_exists,
                tag_name,
                span: parser.span_from(start),
            }))
        }
        TokenKind::Rename => {
            parser.advance();
            parser.expect(TokenKind::Tag)?;
            let from = parse_identifier(parser)?;
            parser.expect(TokenKind::To)?;
            let to = parse_identifier(parser)?;
            Ok(Statement::RenameTag(RenameTagStatement {
                table,
                from,
                to,
                span: parser.span_from(start),
            }))
        }
        _ => Err(parser.error("CREATE, REPLACE, DELETE or RENAME after ALTER TABLE")),
    }
}

/// Parse `CREATE TAG [IF NOT EXISTS] ...` or `[CREATE OR] REPLACE TAG ...`
fn parse_tag_clause(parser: &mut Parser) -> Result<TagClause> {
    if parser.consume(TokenKind::Create) {
        if parser.consume(TokenKind::Or) {
            parser.expect(TokenKind::Replace)?;
            return parse_replace_tag(parser, true);
        }
        if !parser.consume(TokenKind::Tag) {
            return Err(parser.error("TAG or OR REPLACE after CREATE"));
        }
        let if_not_exists = if parser.check(TokenKind::If)
            && parser.peek_kind(1) == TokenKind::Not
            && parser.peek_kind(2) == TokenKind::Exists
        {
            parser.advance();
            parser.advance();
            parser.advance();
            true
        } else {
            false
        };
        let name = parse_identifier(parser)?;
        let options = parse_tag_options(parser)?;
        return Ok(TagClause::Create {
            if_not_exists,
            name,
            options,
        });
    }

    parser.expect(TokenKind::Replace)?;
    parse_replace_tag(parser, false)
}

fn parse_replace_tag(parser: &mut Parser, create_if_missing: bool) -> Result<TagClause> {
    parser.expect(TokenKind::Tag)?;
    let name = parse_identifier(parser)?;
    let options = parse_tag_options(parser)?;
    Ok(TagClause::Replace {
        create_if_missing,
        name,
        options,
    })
}

/// Parse `[AS OF VERSION n] [RETAIN n DAYS|HOURS|MINUTES]`
fn parse_tag_options(parser: &mut Parser) -> Result<TagOptions> {
    let snapshot_id = if parser.consume(TokenKind::As) {
        parser.expect(TokenKind::Of)?;
        parser.expect(TokenKind::Version)?;
        Some(parse_number(parser)?)
    } else {
        None
    };

    let retain = if parser.consume(TokenKind::Retain) {
        let amount = parse_number(parser)?;
        let unit = parse_time_unit(parser)?;
        Some(TimeRetain { amount, unit })
    } else {
        None
    };

    Ok(TagOptions { snapshot_id, retain })
}

fn parse_time_unit(parser: &mut Parser) -> Result<TimeUnit> {
    let unit = match parser.kind() {
        TokenKind::Days => TimeUnit::Days,
        TokenKind::Hours => TimeUnit::Hours,
        TokenKind::Minutes => TimeUnit::Minutes,
        _ => return Err(parser.error("DAYS, HOURS or MINUTES")),
    };
    parser.advance();
    Ok(unit)
}
