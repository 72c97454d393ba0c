//! Paths command - print every filesystem location kextsync uses

use crate::cli::Cli;
use crate::output;
use anyhow::Result;
use kextsync_core::Locations;

pub fn run(cli: &Cli) -> Result<()> {
    let locations = match &cli.db_root {
        Some(root) => Locations::with_root(root)?,
        None => Locations::resolve()?,
    };

    output::header("Locations");
    output::kv("Application", locations.app_path().as_str());
    output::kv("Cache", locations.app_cache_path().as_str());
    output::kv("Kext database", locations.kext_db_path().as_str());
    output::kv("Kext cache", locations.kext_cache_path().as_str());
    output::kv("Guide cache", locations.guide_cache_path().as_str());
    output::kv("PCI ID cache", locations.pci_ids_cache_path().as_str());
    output::kv("Temp", locations.tmp_path().as_str());
    output::kv("Kext temp", locations.kext_tmp_path().as_str());
    output::kv("Lock file", locations.lock_file().as_str());
    output::kv("Stdin capture", locations.stdin_path().as_str());
    output::kv("Stdout capture", locations.stdout_path().as_str());
    output::kv("Stderr capture", locations.stderr_path().as_str());
    Ok(())
}
