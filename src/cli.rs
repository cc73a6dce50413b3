//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Sibling Build - Coordinate builds of source-sharing sibling libraries
///
/// Configuration is read from `sibling-build.yaml` in the current directory,
/// or from the path in `SIBLING_BUILD_CONFIG`. Log verbosity follows
/// `RUST_LOG` (default: info).
#[derive(Parser, Debug)]
#[command(name = "sibling-build")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync shared sources, build every project, then bundle and distribute
    Build,

    /// Like `build`, with project versions temporarily bumped to a `next` pre-release
    Next,

    /// Stage the newest release set into the release directory
    Cdn,

    /// Run `build`, then `cdn`
    #[command(name = "cdn:build")]
    CdnBuild,

    /// Refresh demo trees: fan-out, cleanup and static assets
    Design,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging();

        match self.command {
            Commands::Build => commands::build::execute(),
            Commands::Next => commands::next::execute(),
            Commands::Cdn => commands::cdn::execute(),
            Commands::CdnBuild => commands::cdn_build::execute(),
            Commands::Design => commands::design::execute(),
        }
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A logger may already be installed when commands run in-process.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
