//! Error handling tests for tagsql
//!
//! Tests for error messages, positions and diagnostic metadata.

use miette::Diagnostic;
use pretty_assertions::assert_eq;
use tagsql::error::{format_caret_report, offset_to_line_col};
use tagsql::{parse, Error};

mod messages {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_error_message() {
        let err = parse("SHOW TAGS t EXTRA").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 13: expected ';' or end of input, found 'EXTRA'"
        );
    }

    #[test]
    fn lex_error_message() {
        let err = parse("CALL p('abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Lex error at line 1, column 8: unterminated string literal"
        );
    }

    #[test]
    fn expected_keyword_is_named() {
        let err = parse("SHOW t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 6: expected TAGS, found 't'"
        );
    }

    #[test]
    fn string_token_is_quoted_once() {
        let err = parse("SHOW TAGS 'x'").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 11: expected identifier, found string 'x'"
        );
    }

    #[test]
    fn rename_without_to() {
        let err = parse("ALTER TABLE t RENAME TAG a b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 28: expected TO, found 'b'"
        );
    }
}

mod positions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn multi_line_statement() {
        let err = parse("ALTER TABLE t\n  DELETE TAG\n  IF EXISTS").unwrap_err();
        match err {
            Error::ParseError {
                line,
                column,
                found,
                ..
            } => {
                assert_eq!(found, "end of input");
                assert_eq!((line, column), (3, 12));
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn offset_accessor() {
        assert_eq!(parse("SHOW TAGS t EXTRA").unwrap_err().offset(), Some(12));
        assert_eq!(parse("`abc").unwrap_err().offset(), Some(0));
    }

    #[test]
    fn offset_matches_line_col_helper() {
        let input = "CALL p(\n  a => 1,\n  b => ?)";
        let err = parse(input).unwrap_err();
        let offset = err.offset().unwrap();
        assert_eq!(&input[offset..offset + 1], "?");
        assert_eq!(offset_to_line_col(input, offset), (3, 8));
    }

    #[test]
    fn caret_report() {
        let input = "SHOW TAGS t EXTRA";
        let err = parse(input).unwrap_err();
        assert_eq!(
            format_caret_report(input, &err).lines().collect::<Vec<_>>(),
            vec![
                "parse error at 1:13",
                "   1 | SHOW TAGS t EXTRA",
                "     |             ^ expected ';' or end of input, found 'EXTRA'",
            ]
        );
    }

    #[test]
    fn caret_report_on_later_line() {
        let input = "CALL p(\n  a => 'open";
        let err = parse(input).unwrap_err();
        assert_eq!(
            format_caret_report(input, &err).lines().collect::<Vec<_>>(),
            vec![
                "lex error at 2:8",
                "   2 |   a => 'open",
                "     |        ^ unterminated string literal",
            ]
        );
    }
}

mod diagnostics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_error_code_and_label() {
        let err = parse("SHOW TAGS t EXTRA").unwrap_err();
        assert_eq!(err.code().map(|c| c.to_string()), Some("tagsql::parse_error".to_string()));

        let labels: Vec<_> = err.labels().expect("labels").collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 12);
        assert_eq!(labels[0].len(), 5);
    }

    #[test]
    fn lex_error_code_and_label() {
        let err = parse("SHOW TAGS `abc").unwrap_err();
        assert_eq!(err.code().map(|c| c.to_string()), Some("tagsql::lex_error".to_string()));

        let labels: Vec<_> = err.labels().expect("labels").collect();
        assert_eq!(labels[0].offset(), 10);
        assert_eq!(labels[0].len(), 4);
    }

    #[test]
    fn io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::IoError(_)));
        assert_eq!(err.offset(), None);
    }
}
