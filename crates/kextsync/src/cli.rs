//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Kextsync - kext catalog synchronization and resolution
#[derive(Parser, Debug)]
#[command(name = "kextsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Keep all kextsync state under this directory instead of the
    /// platform's standard locations
    #[arg(long, global = true, value_name = "DIR")]
    pub db_root: Option<Utf8PathBuf>,

    /// Kext database repository URL
    #[arg(long, global = true, env = "KEXTSYNC_REPO", value_name = "URL")]
    pub repo: Option<String>,

    /// Kext database branch
    #[arg(long, global = true, env = "KEXTSYNC_BRANCH", value_name = "BRANCH")]
    pub branch: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the kext database mirror and pull remote updates
    Sync(SyncArgs),

    /// List known kexts and their remote download locations
    List(ListArgs),

    /// Show kext database mirror status
    Status(StatusArgs),

    /// Print every filesystem location kextsync uses
    Paths,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Discard a corrupt mirror and clone it from scratch
    #[arg(long)]
    pub force: bool,

    /// Seconds to wait for the mirror lock before giving up
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub lock_timeout: u64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list kexts installed on this host
    #[arg(long)]
    pub installed: bool,

    /// Only list kexts with a resolvable remote download URL
    #[arg(long)]
    pub remote: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_defaults() {
        let cli = Cli::parse_from(["kextsync", "sync"]);
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert!(!args.force);
        assert_eq!(args.lock_timeout, 10);
    }

    #[test]
    fn test_global_db_root_flag() {
        let cli = Cli::parse_from(["kextsync", "list", "--db-root", "/tmp/ks"]);
        assert_eq!(cli.db_root.as_deref().map(|p| p.as_str()), Some("/tmp/ks"));
    }
}
