//! The carmine command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::Path;
use std::{fs, process};

use clap::Parser;
use walkdir::WalkDir;

use crate::cli::args::{CarmineArgs, Command};
use crate::diagnostics::{print_error, CarmineError, SourceContext};
use crate::grammar::Language;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = CarmineArgs::parse();

    let result = match args.command {
        Command::Parse { file, json } => handle_parse(&file, json).map(|_| 0),
        Command::Tokens { file } => handle_tokens(&file).map(|_| 0),
        Command::Check { path } => handle_check(&path),
    };

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(error) => {
            print_error(error);
            process::exit(1);
        }
    }
}

fn parse_file(path: &Path) -> Result<crate::Tree, CarmineError> {
    let source = fs::read_to_string(path)?;
    let mut parser = crate::Parser::new(Language::red())?;
    let context = SourceContext::from_file(path.to_string_lossy(), source.clone());
    let tree = parser.parse(&source, context)?;
    Ok(tree)
}

/// Handles the `parse` subcommand.
fn handle_parse(path: &Path, json: bool) -> Result<(), CarmineError> {
    let tree = parse_file(path)?;
    if json {
        output::print_tree_json(&tree).map_err(|e| {
            CarmineError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
    } else {
        output::print_tree(&tree);
    }
    Ok(())
}

/// Handles the `tokens` subcommand.
fn handle_tokens(path: &Path) -> Result<(), CarmineError> {
    let source = fs::read_to_string(path)?;
    let context = SourceContext::from_file(path.to_string_lossy(), source.clone());
    let values = crate::syntax::lexer::scan_values(
        &source,
        &context,
        crate::grammar::language().months,
    )?;
    output::print_values(&values, &source);
    Ok(())
}

fn is_red_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("red") | Some("reds")
    )
}

/// Handles the `check` subcommand. Returns the process exit code: zero when
/// every file parses, one otherwise.
fn handle_check(path: &Path) -> Result<i32, CarmineError> {
    let files: Vec<_> = if path.is_dir() {
        WalkDir::new(path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| is_red_source(p))
            .collect()
    } else {
        vec![path.to_path_buf()]
    };

    let mut failures = 0usize;
    for file in &files {
        if let Err(error) = parse_file(file) {
            print_error(error);
            failures += 1;
        }
    }

    println!(
        "checked {} file{}, {} with errors",
        files.len(),
        if files.len() == 1 { "" } else { "s" },
        failures
    );
    Ok(if failures > 0 { 1 } else { 0 })
}
