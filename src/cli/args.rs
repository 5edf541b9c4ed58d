//! Defines the command-line arguments and subcommands for the carmine CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "carmine",
    version,
    about = "A parser and syntax toolkit for the Red programming language."
)]
pub struct CarmineArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a Red script and print its syntax tree.
    Parse {
        /// The path to the Red script to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Emit the tree as JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },
    /// Print the scanned value stream of a Red script.
    Tokens {
        /// The path to the Red script to scan.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse one file, or every Red file under a directory, and report
    /// diagnostics.
    Check {
        /// A Red script or a directory to search for `.red`/`.reds` files.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}
