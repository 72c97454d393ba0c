//! Sync command - initialize the mirror and pull remote updates

use crate::cli::{Cli, SyncArgs};
use crate::output;
use crate::utils::build_engine;
use anyhow::Result;
use kextsync_core::SyncError;
use std::time::Duration;
use tracing::warn;

pub async fn run(cli: &Cli, args: &SyncArgs) -> Result<()> {
    let engine = build_engine(cli, Some(Duration::from_secs(args.lock_timeout)))?;

    let spinner = output::spinner("Synchronizing kext database...");

    match engine.init_db().await {
        Ok(()) => {}
        Err(e @ SyncError::Corrupt { .. }) if args.force => {
            warn!("{e}; re-cloning");
            spinner.set_message("Mirror corrupt, cloning from scratch...");
            engine.force_reinit().await?;
        }
        Err(e @ SyncError::Corrupt { .. }) => {
            spinner.finish_and_clear();
            output::error(&e.to_string());
            output::info("Run `kextsync sync --force` to discard the mirror and re-clone");
            return Err(e.into());
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    }

    match engine.check_for_db_update().await {
        Ok(true) => {
            spinner.finish_and_clear();
            output::success("Kext database updated");
        }
        Ok(false) => {
            spinner.finish_and_clear();
            output::success("Kext database already up to date");
        }
        Err(SyncError::NetworkUnavailable { detail }) => {
            // Non-fatal: the last good mirror stays usable.
            spinner.finish_and_clear();
            warn!("remote unreachable: {detail}");
            output::warning("Remote catalog unreachable; keeping the last good mirror");
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    }

    Ok(())
}
