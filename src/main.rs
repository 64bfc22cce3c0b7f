//! tagsql CLI - Parse and format table tag / CALL extension statements

use clap::Parser;
use miette::{NamedSource, Report};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tagsql::cli::{discover_files, read_source, Cli, Commands, Source, LOG_ENV};
use tagsql::error::format_caret_report;
use tagsql::parser::lexer::{tokenize, tokenize_with_hidden};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match &cli.command {
        Commands::Parse { files } => run_parse(files, cli.plain),
        Commands::Tokens { hidden, files } => run_tokens(files, *hidden, cli.plain),
        Commands::Fmt { write, files } => run_fmt(files, *write, cli.plain),
        Commands::Check { files } => run_check(files, cli.plain),
    }
}

/// Log to stderr, filtered by `TAGSQL_LOG` or the -v count
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the parse command
fn run_parse(files: &[PathBuf], plain: bool) -> ExitCode {
    let mut had_errors = false;
    let inputs = match discover_files(files) {
        Ok(inputs) => inputs,
        Err(e) => return fail(e),
    };
    let show_names = inputs.len() > 1;

    for path in &inputs {
        let Some(source) = load(path, &mut had_errors) else {
            continue;
        };
        match tagsql::parse(&source.text) {
            Ok(stmt) => {
                if show_names {
                    println!("-- {}", source.name);
                }
                println!("{:#?}", stmt);
            }
            Err(e) => {
                report(&source, e, plain);
                had_errors = true;
            }
        }
    }

    exit_code(had_errors, false)
}

/// Run the tokens command
fn run_tokens(files: &[PathBuf], hidden: bool, plain: bool) -> ExitCode {
    let mut had_errors = false;
    let inputs = match discover_files(files) {
        Ok(inputs) => inputs,
        Err(e) => return fail(e),
    };

    for path in &inputs {
        let Some(source) = load(path, &mut had_errors) else {
            continue;
        };
        let tokens = if hidden {
            tokenize_with_hidden(&source.text)
        } else {
            tokenize(&source.text)
        };
        match tokens {
            Ok(tokens) => {
                for token in tokens {
                    println!(
                        "{}:{} {:?} {:?}",
                        token.span.line, token.span.column, token.kind, token.text
                    );
                }
            }
            Err(e) => {
                report(&source, e, plain);
                had_errors = true;
            }
        }
    }

    exit_code(had_errors, false)
}

/// Run the fmt command
fn run_fmt(files: &[PathBuf], write_mode: bool, plain: bool) -> ExitCode {
    let mut had_errors = false;
    let inputs = match discover_files(files) {
        Ok(inputs) => inputs,
        Err(e) => return fail(e),
    };

    for path in &inputs {
        let Some(source) = load(path, &mut had_errors) else {
            continue;
        };
        let formatted = match tagsql::format(&source.text) {
            Ok(formatted) => formatted,
            Err(e) => {
                report(&source, e, plain);
                had_errors = true;
                continue;
            }
        };

        match (&source.path, write_mode) {
            (Some(path), true) => {
                let contents = format!("{}\n", formatted);
                if contents != source.text {
                    if let Err(e) = fs::write(path, contents) {
                        eprintln!("{}: {}", source.name, e);
                        had_errors = true;
                    } else {
                        tracing::info!(file = %source.name, "reformatted");
                    }
                }
            }
            _ => println!("{}", formatted),
        }
    }

    exit_code(had_errors, false)
}

/// Run the check command
fn run_check(files: &[PathBuf], plain: bool) -> ExitCode {
    let mut had_errors = false;
    let mut needs_formatting = false;
    let inputs = match discover_files(files) {
        Ok(inputs) => inputs,
        Err(e) => return fail(e),
    };

    for path in &inputs {
        let Some(source) = load(path, &mut had_errors) else {
            continue;
        };
        match tagsql::check(&source.text) {
            Ok(true) => {}
            Ok(false) => {
                eprintln!("{}: needs formatting", source.name);
                needs_formatting = true;
            }
            Err(e) => {
                report(&source, e, plain);
                had_errors = true;
            }
        }
    }

    exit_code(had_errors, needs_formatting)
}

fn load(path: &Path, had_errors: &mut bool) -> Option<Source> {
    match read_source(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            *had_errors = true;
            None
        }
    }
}

/// Render a lex or parse error against its source text
fn report(source: &Source, error: tagsql::Error, plain: bool) {
    tracing::debug!(file = %source.name, offset = ?error.offset(), "statement rejected");
    if plain {
        eprintln!("{}: {}", source.name, format_caret_report(&source.text, &error));
        return;
    }
    let report = Report::new(error).with_source_code(NamedSource::new(&source.name, source.text.clone()));
    eprintln!("{:?}", report);
}

fn fail(error: tagsql::Error) -> ExitCode {
    eprintln!("Error: {}", error);
    ExitCode::from(2)
}

fn exit_code(had_errors: bool, needs_formatting: bool) -> ExitCode {
    if had_errors {
        ExitCode::from(2)
    } else if needs_formatting {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
