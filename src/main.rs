//! # Canasta Diff CLI
//!
//! This is the binary entry point for the `canasta-diff` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the fetch/compare/output pipeline.
//! - Handling top-level application errors and translating them into
//!   user-friendly output and exit codes.
//!
//! Exit codes: 0 on success, 1 on any pipeline failure (with a one-line
//! message on stderr), 2 on command-line usage errors (from clap), and 130
//! when interrupted (the default SIGINT disposition).
//!
//! The core application logic is defined in the `canasta_diff` library
//! crate, ensuring that the binary is a thin wrapper around the reusable
//! library functionality.

mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    env_logger::init();
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to compare YAML files: {e:#}");
            ExitCode::FAILURE
        }
    }
}
