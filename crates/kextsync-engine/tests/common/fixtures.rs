//! Test fixtures for engine integration tests
//!
//! Builds a throwaway upstream catalog repository with the real git
//! binary, plus per-test workspaces holding a mirror path and lock file.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use kextsync_engine::{GitCatalogSource, MirrorSynchronizer};
use std::process::Command;
use tempfile::TempDir;

/// Branch the fixture repository carries its catalog on
pub const FIXTURE_BRANCH: &str = "kext_db";

/// A throwaway upstream catalog repository plus scratch space
pub struct CatalogFixture {
    temp: TempDir,
    /// Path of the upstream repository working copy
    pub upstream: Utf8PathBuf,
}

impl CatalogFixture {
    /// Create an upstream repository whose catalog file holds
    /// `catalog_json`
    pub fn new(catalog_json: &str) -> Self {
        let temp = TempDir::new().expect("create fixture tempdir");
        let upstream = utf8(temp.path().join("upstream"));
        std::fs::create_dir_all(&upstream).expect("create upstream dir");

        git(&upstream, &["init", "--quiet"]);
        git(&upstream, &["checkout", "-q", "-b", FIXTURE_BRANCH]);
        std::fs::write(upstream.join("catalog.json"), catalog_json).expect("write catalog");
        git(&upstream, &["add", "."]);
        commit(&upstream, "seed catalog");

        Self { temp, upstream }
    }

    /// Clone URL of the upstream repository
    pub fn repo_url(&self) -> String {
        format!("file://{}", self.upstream)
    }

    /// Commit a new catalog revision upstream
    pub fn push_catalog(&self, catalog_json: &str) {
        std::fs::write(self.upstream.join("catalog.json"), catalog_json)
            .expect("write catalog update");
        git(&self.upstream, &["add", "."]);
        commit(&self.upstream, "update catalog");
    }

    /// Revision at the upstream branch tip
    pub fn head(&self) -> String {
        let output = Command::new("git")
            .args(["-C", self.upstream.as_str(), "rev-parse", "HEAD"])
            .output()
            .expect("run git rev-parse");
        assert!(output.status.success(), "rev-parse failed");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Fresh scratch directory under the fixture's tempdir
    pub fn workspace(&self, name: &str) -> Utf8PathBuf {
        let dir = utf8(self.temp.path().join(name));
        std::fs::create_dir_all(&dir).expect("create workspace dir");
        dir
    }

    /// Synchronizer over a mirror and lock file inside `workspace(name)`
    pub fn synchronizer(&self, name: &str) -> MirrorSynchronizer<GitCatalogSource> {
        let root = self.workspace(name);
        MirrorSynchronizer::new(
            GitCatalogSource::new(self.repo_url(), FIXTURE_BRANCH),
            root.join("kext_db"),
            root.join("kext_db.lock"),
        )
    }
}

fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path).expect("UTF-8 tempdir path")
}

fn git(dir: &Utf8Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed in {dir}");
}

fn commit(dir: &Utf8Path, message: &str) {
    git(
        dir,
        &[
            "-c",
            "user.name=kextsync tests",
            "-c",
            "user.email=tests@example.invalid",
            "commit",
            "-q",
            "-m",
            message,
        ],
    );
}
