//! Canonical rendering of parsed statements
//!
//! Keywords are upper-cased, tokens separated by single spaces, and
//! identifiers back-quoted only when the bare name would not lex back to the
//! same identifier.

pub mod printer;

use crate::ast::*;
use crate::parser::lexer::TokenKind;
use printer::Printer;

/// Render a statement in canonical form, without a trailing semicolon
pub fn format_statement(stmt: &Statement) -> String {
    let mut p = Printer::new();

    match stmt {
        Statement::Call(call) => {
            p.word("CALL");
            p.word(&format_multipart_identifier(&call.procedure));
            p.open("(");
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    p.comma();
                }
                if let CallArgument::Named { name, .. } = arg {
                    p.word(&format_identifier(name));
                    p.word("=>");
                }
                format_expression(&mut p, arg.value());
            }
            p.attach(")");
        }
        Statement::ShowTags(show) => {
            p.word("SHOW TAGS");
            p.word(&format_multipart_identifier(&show.table));
        }
        Statement::CreateOrReplaceTag(s) => {
            alter_table(&mut p, &s.table);
            match &s.clause {
                TagClause::Create { if_not_exists, .. } => {
                    p.word("CREATE TAG");
                    if *if_not_exists {
                        p.word("IF NOT EXISTS");
                    }
                }
                TagClause::Replace {
                    create_if_missing, ..
                } => {
                    if *create_if_missing {
                        p.word("CREATE OR");
                    }
                    p.word("REPLACE TAG");
                }
            }
            p.word(&format_identifier(s.clause.name()));
            format_tag_options(&mut p, s.clause.options());
        }
        Statement::DeleteTag(s) => {
            alter_table(&mut p, &s.table);
            p.word("DELETE TAG");
            if s.if_exists {
                p.word("IF EXISTS");
            }
            p.word(&format_identifier(&s.tag_name));
        }
        Statement::RenameTag(s) => {
            alter_table(&mut p, &s.table);
            p.word("RENAME TAG");
            p.word(&format_identifier(&s.from));
            p.word("TO");
            p.word(&format_identifier(&s.to));
        }
    }

    p.finish()
}

fn alter_table(p: &mut Printer, table: &MultipartIdentifier) {
    p.word("ALTER TABLE");
    p.word(&format_multipart_identifier(table));
}

fn format_tag_options(p: &mut Printer, options: &TagOptions) {
    if let Some(snapshot_id) = &options.snapshot_id {
        p.word("AS OF VERSION");
        p.word(&format_number(snapshot_id));
    }
    if let Some(retain) = &options.retain {
        p.word("RETAIN");
        p.word(&format_number(&retain.amount));
        p.word(retain.unit.keyword());
    }
}

fn format_expression(p: &mut Printer, expr: &Expression) {
    match expr {
        Expression::Constant(constant) => p.word(&format_constant(constant)),
        Expression::StringMap { entries, .. } => {
            p.word("MAP");
            p.open("(");
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    p.comma();
                }
                p.word(&format_constant(entry));
            }
            p.attach(")");
        }
    }
}

/// Render a single constant
pub fn format_constant(constant: &Constant) -> String {
    match constant {
        Constant::Number(number) => format_number(number),
        Constant::Boolean { value: true, .. } => "TRUE".to_string(),
        Constant::Boolean { value: false, .. } => "FALSE".to_string(),
        Constant::StringLiteral { value, .. } => quote_string(value),
        Constant::TypeConstructor {
            type_name, value, ..
        } => format!("{} {}", format_identifier(type_name), quote_string(value)),
    }
}

pub fn format_number(number: &Number) -> String {
    if number.negative {
        format!("-{}", number.text)
    } else {
        number.text.clone()
    }
}

/// Render an identifier, back-quoting it when needed
pub fn format_identifier(ident: &Identifier) -> String {
    if needs_quotes(&ident.value) {
        format!("`{}`", ident.value.replace('`', "``"))
    } else {
        ident.value.clone()
    }
}

pub fn format_multipart_identifier(name: &MultipartIdentifier) -> String {
    name.parts
        .iter()
        .map(format_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

fn needs_quotes(name: &str) -> bool {
    let Some(first) = name.bytes().next() else {
        return true;
    };
    if first.is_ascii_digit() || !name.bytes().all(|c| c.is_ascii_alphanumeric() || c == b'_') {
        return true;
    }
    TokenKind::keyword(name).is_some_and(|kind| !kind.is_non_reserved())
}

/// Single-quote a string value, escaping what the lexer would unescape
///
/// NUL is written as `\u0000` so a following digit cannot turn it into an
/// octal escape.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\u0000"),
            '\u{8}' => out.push_str("\\b"),
            '\u{1A}' => out.push_str("\\Z"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
