//! Hand-written lexer and recursive-descent parser for the extension dialect

pub mod expr;
pub mod lexer;
pub mod stmt;

use crate::ast::Statement;
use crate::error::Result;
use expr::Parser;
use lexer::{tokenize, TokenKind};

/// Parse exactly one statement, optionally followed by semicolons
pub fn parse(input: &str) -> Result<Statement> {
    // Step 1: Tokenize
    let tokens = tokenize(input)?;
    tracing::debug!(tokens = tokens.len(), "tokenized statement");

    // Step 2: Parse tokens into AST
    let mut parser = Parser::new(&tokens);
    let stmt = stmt::parse_statement(&mut parser)?;

    // Step 3: Only semicolons may follow the statement
    while parser.consume(TokenKind::Semicolon) {}
    if !parser.is_eof() {
        return Err(parser.error("';' or end of input"));
    }

    tracing::debug!(kind = stmt.kind_name(), "parsed statement");
    Ok(stmt)
}
