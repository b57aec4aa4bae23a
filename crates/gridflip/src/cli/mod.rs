//! CLI module for gridflip.
//!
//! The binary drives the engine against an in-memory grid, so animation
//! curves and option files can be inspected without a rendering host.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::GridResult;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> GridResult<()> {
    let cli = Cli::parse();
    cli.execute()
}
