//! # Sibling Build CLI
//!
//! This is the binary entry point for the `sibling-build` command-line tool.
//!
//! Its responsibilities are parsing the command with `clap`, running it, and
//! turning a failure into a logged error and a non-zero exit status. The
//! coordination logic lives in the library crate.

mod cli;
mod commands;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(e) = cli.execute() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
