//! Status command - mirror state reporting

use crate::cli::{Cli, StatusArgs};
use crate::output;
use crate::utils::build_engine;
use anyhow::Result;

pub async fn run(cli: &Cli, args: &StatusArgs) -> Result<()> {
    let engine = build_engine(cli, None)?;
    let status = engine.status().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    output::header("Kext Database");
    output::kv("Mirror", &status.db_path);
    output::kv(
        "Initialized",
        if status.initialized { "yes" } else { "no" },
    );
    if let Some(revision) = &status.revision {
        output::kv("Revision", revision);
    }
    if let Some(entries) = status.catalog_entries {
        output::kv("Catalog entries", &entries.to_string());
    }
    if !status.initialized {
        output::info("Run `kextsync sync` to initialize the kext database mirror");
    }
    Ok(())
}
