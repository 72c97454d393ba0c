//! Kextsync CLI - kext catalog synchronization and resolution
//!
//! This is the main entry point for the kextsync command-line interface.

mod cli;
mod commands;
mod output;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Sync(args) => commands::sync::run(&cli, args).await,
        Commands::List(args) => commands::list::run(&cli, args).await,
        Commands::Status(args) => commands::status::run(&cli, args).await,
        Commands::Paths => commands::paths::run(&cli),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
