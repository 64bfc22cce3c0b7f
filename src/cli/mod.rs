//! CLI argument parsing and file discovery

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Environment variable holding a tracing filter such as `tagsql=debug`
pub const LOG_ENV: &str = "TAGSQL_LOG";

/// tagsql - Parse and format table tag / CALL extension statements
#[derive(Parser, Debug)]
#[command(name = "tagsql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print errors as plain text with a caret instead of a rich diagnostic
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the syntax tree of each statement
    Parse {
        /// Files or directories to parse (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the token stream of each statement
    Tokens {
        /// Include whitespace and comment tokens
        #[arg(long)]
        hidden: bool,

        /// Files or directories to tokenize (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Format statements into canonical form
    Fmt {
        /// Write formatted output back to files
        #[arg(short, long)]
        write: bool,

        /// Files or directories to format (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check if statements are in canonical form
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// Default tracing filter when `TAGSQL_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// An input statement and where it came from
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub path: Option<PathBuf>,
    pub text: String,
}

/// Discover SQL files in the given paths
///
/// `-` stands for stdin and is passed through as-is. Directories are walked
/// recursively for `*.sql` files.
pub fn discover_files(paths: &[PathBuf]) -> crate::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path == Path::new("-") || path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && path.extension().map_or(false, |ext| ext == "sql") {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file or directory", path.display()),
            )
            .into());
        }
    }

    Ok(files)
}

/// Read a discovered input
pub fn read_source(path: &Path) -> crate::Result<Source> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(Source {
            name: "<stdin>".to_string(),
            path: None,
            text,
        });
    }

    let text = fs::read_to_string(path)?;
    Ok(Source {
        name: path.display().to_string(),
        path: Some(path.to_path_buf()),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_maps_to_filter() {
        let cli = Cli::parse_from(["tagsql", "-vv", "parse", "-"]);
        assert_eq!(cli.log_filter(), "debug");
        assert!(!cli.plain);
    }

    #[test]
    fn test_plain_is_global() {
        let cli = Cli::parse_from(["tagsql", "check", "--plain", "a.sql"]);
        assert!(cli.plain);
    }

    #[test]
    fn test_missing_path_is_error() {
        let result = discover_files(&[PathBuf::from("/definitely/not/here.sql")]);
        assert!(matches!(result, Err(crate::Error::IoError(_))));
    }
}
