//! List command - reconciled kext view

use crate::cli::{Cli, ListArgs};
use crate::utils::build_engine;
use anyhow::Result;
use serde_json::json;
use std::collections::HashSet;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct KextRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Installed")]
    installed: String,
    #[tabled(rename = "Remote")]
    remote: String,
}

pub async fn run(cli: &Cli, args: &ListArgs) -> Result<()> {
    let engine = build_engine(cli, None)?;

    if args.installed {
        let installed = engine.list_installed_kexts()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&installed)?);
        } else {
            for name in installed {
                println!("{name}");
            }
        }
        return Ok(());
    }

    if args.remote {
        let remote = engine.list_remote_kexts()?;
        if args.json {
            let map: serde_json::Map<_, _> = remote
                .iter()
                .map(|(name, url)| (name.clone(), json!(url.as_str())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        } else {
            for (name, url) in &remote {
                println!("{name}\t{url}");
            }
        }
        return Ok(());
    }

    let installed: HashSet<String> = engine.list_installed_kexts()?.into_iter().collect();
    let known = engine.list_kexts()?;
    let remote = engine.list_remote_kexts()?;

    if args.json {
        let entries: Vec<_> = known
            .iter()
            .map(|name| {
                json!({
                    "name": name,
                    "installed": installed.contains(name),
                    "remote": remote.get(name).map(|url| url.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let rows: Vec<KextRow> = known
        .iter()
        .map(|name| KextRow {
            name: name.clone(),
            installed: if installed.contains(name) { "yes" } else { "" }.to_string(),
            remote: remote
                .get(name)
                .map(|url| url.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
