//! Error types for tagsql

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for tagsql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tagsql
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Lex error at line {line}, column {column}: {message}")]
    #[diagnostic(code(tagsql::lex_error))]
    LexError {
        message: String,
        unexpected: char,
        offset: usize,
        line: usize,
        column: usize,
        #[label("starts here")]
        span: (usize, usize),
    },

    #[error("Parse error at line {line}, column {column}: expected {expected}, found {found}")]
    #[diagnostic(code(tagsql::parse_error))]
    ParseError {
        expected: String,
        found: String,
        offset: usize,
        line: usize,
        column: usize,
        #[label("here")]
        span: (usize, usize),
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(tagsql::io_error))]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Byte offset of the error in the statement text, if it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::LexError { offset, .. } | Error::ParseError { offset, .. } => Some(*offset),
            Error::IoError(_) => None,
        }
    }

    /// The message without its position prefix
    pub fn detail(&self) -> String {
        match self {
            Error::LexError { message, .. } => message.clone(),
            Error::ParseError { expected, found, .. } => {
                format!("expected {}, found {}", expected, found)
            }
            Error::IoError(e) => e.to_string(),
        }
    }
}

/// Calculate line and column number from byte offset
pub fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in input.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Get the line content at a given line number (1-indexed)
pub fn get_line_content(input: &str, line_num: usize) -> Option<&str> {
    input.lines().nth(line_num.saturating_sub(1))
}

/// Plain-text report: the offending line with a caret under the error column
///
/// Errors without a position render as their message alone.
pub fn format_caret_report(input: &str, error: &Error) -> String {
    let Some(offset) = error.offset() else {
        return error.to_string();
    };
    let (line, col) = offset_to_line_col(input, offset);
    let line_content = get_line_content(input, line).unwrap_or("");
    let kind = match error {
        Error::LexError { .. } => "lex error",
        _ => "parse error",
    };

    format!(
        "{} at {}:{}\n{:>4} | {}\n     | {}^ {}",
        kind,
        line,
        col,
        line,
        line_content,
        " ".repeat(col.saturating_sub(1)),
        error.detail()
    )
}
