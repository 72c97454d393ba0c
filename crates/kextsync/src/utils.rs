//! Shared helpers for command handlers

use crate::cli::Cli;
use anyhow::Result;
use kextsync_core::Locations;
use kextsync_engine::{EngineConfig, KextEngine};
use std::time::Duration;

/// Build the engine from the global CLI flags. `lock_timeout` overrides
/// the default bound on waiting for the mirror lock.
pub fn build_engine(cli: &Cli, lock_timeout: Option<Duration>) -> Result<KextEngine> {
    let locations = match &cli.db_root {
        Some(root) => Locations::with_root(root)?,
        None => Locations::resolve()?,
    };

    let mut config = EngineConfig::default();
    if let Some(repo) = &cli.repo {
        config.repo_url = repo.clone();
    }
    if let Some(branch) = &cli.branch {
        config.branch = branch.clone();
    }
    if let Some(timeout) = lock_timeout {
        config.lock_timeout = timeout;
    }

    Ok(KextEngine::new(locations, config)?)
}
