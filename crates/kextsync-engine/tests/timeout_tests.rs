//! Network-timeout behavior: a timed-out git subprocess must die with the
//! operation and leave the mirror path untouched.
//!
//! Runs a stand-in `git` from a private PATH entry, so this suite owns the
//! whole test binary and shares no fixtures with the real-git suites.

#![cfg(unix)]

use camino::Utf8PathBuf;
use kextsync_core::SyncError;
use kextsync_engine::{CatalogSource, GitCatalogSource};
use std::time::Duration;
use tempfile::TempDir;

/// Mimics a clone whose remote has gone quiet: nothing happens for a
/// while, then it starts writing into the destination.
const STALLED_GIT: &str = r#"#!/bin/sh
for arg; do dest="$arg"; done
sleep 1
mkdir -p "$dest/partial"
echo object > "$dest/partial/object"
sleep 1
"#;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timed_out_clone_kills_git_and_leaves_no_partial_mirror() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let fake_git = bin.join("git");
    std::fs::write(&fake_git, STALLED_GIT).unwrap();
    std::fs::set_permissions(&fake_git, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::env::set_var(
        "PATH",
        format!("{}:{}", bin, std::env::var("PATH").unwrap_or_default()),
    );

    let mirror = root.join("kext_db");
    let source = GitCatalogSource::new("file:///unreachable/upstream", "kext_db")
        .with_network_timeout(Duration::from_millis(300));

    let err = source.clone_to(&mirror).await.unwrap_err();
    assert!(matches!(err, SyncError::NetworkUnavailable { .. }));
    assert!(!mirror.exists());

    // Outlive the stand-in's full script: had the child survived the
    // timeout, the mirror path would reappear with partial content.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(
        !mirror.exists(),
        "timed-out git child kept mutating the mirror path"
    );
}
