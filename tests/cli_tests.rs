//! CLI integration tests
//!
//! Tests for the tagsql command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tagsql() -> Command {
    let mut cmd = Command::cargo_bin("tagsql").unwrap();
    cmd.env_remove("TAGSQL_LOG");
    cmd
}

mod parse_command {
    use super::*;

    #[test]
    fn parse_file_prints_ast() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("show.sql");
        fs::write(&file_path, "SHOW TAGS db.tbl\n").unwrap();

        tagsql()
            .arg("parse")
            .arg(&file_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("ShowTags"))
            .stdout(predicate::str::contains("\"tbl\""));
    }

    #[test]
    fn parse_error_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("bad.sql");
        fs::write(&file_path, "SHOW TAGS t EXTRA").unwrap();

        tagsql()
            .arg("parse")
            .arg(&file_path)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Parse error"));
    }

    #[test]
    fn plain_error_shows_caret() {
        tagsql()
            .arg("parse")
            .arg("--plain")
            .arg("-")
            .write_stdin("SHOW TAGS t EXTRA")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("parse error at 1:13"))
            .stderr(predicate::str::contains("   1 | SHOW TAGS t EXTRA"))
            .stderr(predicate::str::contains("^ expected ';' or end of input, found 'EXTRA'"));
    }

    #[test]
    fn parse_directory_walks_sql_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.sql"), "SHOW TAGS a").unwrap();
        fs::write(temp.path().join("b.sql"), "ALTER TABLE b DELETE TAG x").unwrap();
        fs::write(temp.path().join("notes.txt"), "not sql at all").unwrap();

        tagsql()
            .arg("parse")
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("a.sql"))
            .stdout(predicate::str::contains("DeleteTag"))
            .stdout(predicate::str::contains("notes.txt").not());
    }

    #[test]
    fn missing_file_exits_with_two() {
        tagsql()
            .arg("parse")
            .arg("/definitely/not/here.sql")
            .assert()
            .code(2);
    }
}

mod tokens_command {
    use super::*;

    #[test]
    fn tokens_from_stdin() {
        tagsql()
            .arg("tokens")
            .arg("-")
            .write_stdin("SHOW TAGS t")
            .assert()
            .success()
            .stdout(predicate::str::contains("1:1 Show \"SHOW\""))
            .stdout(predicate::str::contains("1:11 Identifier \"t\""))
            .stdout(predicate::str::contains("Whitespace").not());
    }

    #[test]
    fn tokens_with_hidden() {
        tagsql()
            .arg("tokens")
            .arg("--hidden")
            .arg("-")
            .write_stdin("SHOW /* c */ TAGS t")
            .assert()
            .success()
            .stdout(predicate::str::contains("1:6 BlockComment \"/* c */\""));
    }
}

mod fmt_command {
    use super::*;

    #[test]
    fn fmt_stdin_to_stdout() {
        tagsql()
            .arg("fmt")
            .arg("-")
            .write_stdin("show tags t")
            .assert()
            .success()
            .stdout("SHOW TAGS t\n");
    }

    #[test]
    fn fmt_file_in_place() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("tag.sql");
        fs::write(&file_path, "alter table t delete tag if exists v1;").unwrap();

        tagsql()
            .arg("fmt")
            .arg("--write")
            .arg(&file_path)
            .assert()
            .success()
            .stdout("");

        let contents = fs::read_to_string(&file_path).unwrap();
        assert_eq!(contents, "ALTER TABLE t DELETE TAG IF EXISTS v1\n");
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_formatted_file_passes() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("ok.sql");
        fs::write(&file_path, "SHOW TAGS t\n").unwrap();

        tagsql().arg("check").arg(&file_path).assert().success();
    }

    #[test]
    fn check_unformatted_file_fails() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("messy.sql");
        fs::write(&file_path, "show   tags t").unwrap();

        tagsql()
            .arg("check")
            .arg(&file_path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("needs formatting"));
    }
}
