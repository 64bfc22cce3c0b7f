//! tagsql - Parser for the table tag and procedure call SQL extension
//!
//! Turns statements such as `ALTER TABLE t CREATE TAG v1 AS OF VERSION 3` or
//! `CALL sys.rollback(table => 'db.t', version => 5)` into a typed AST for an
//! executor to run against a catalog.

pub mod ast;
pub mod cli;
pub mod error;
pub mod formatter;
pub mod parser;

pub use error::{Error, Result};
pub use formatter::format_statement;
pub use parser::parse;

/// Parse a statement and render it in canonical form
pub fn format(input: &str) -> Result<String> {
    let stmt = parse(input)?;
    Ok(format_statement(&stmt))
}

/// Check if a statement is already in canonical form, ignoring trailing whitespace
pub fn check(input: &str) -> Result<bool> {
    let formatted = format(input)?;
    Ok(formatted == input.trim_end())
}
