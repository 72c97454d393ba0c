//! Catalog source abstraction
//!
//! The mirror synchronizer talks to the remote database through the narrow
//! [`CatalogSource`] trait, so the git dependency is swappable for a plain
//! versioned-archive download without touching the reconciliation code.
//!
//! [`GitCatalogSource`] is the production implementation: it shells out to
//! `git`, pins a single branch, and never creates local commits, so every
//! update is a clean fast-forward (`fetch` + `reset --hard`).

use async_trait::async_trait;
use camino::Utf8Path;
use kextsync_core::SyncError;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default bound on remote round trips. On expiry the operation reports
/// failure with the local mirror untouched.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(60);

/// Narrow interface over the version-controlled catalog source
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Revision currently checked out in the local mirror
    async fn current_revision(&self, mirror: &Utf8Path) -> Result<String, SyncError>;

    /// Latest revision of the pinned branch on the remote
    async fn remote_revision(&self) -> Result<String, SyncError>;

    /// Clone the pinned branch into `mirror` (which must not exist yet)
    async fn clone_to(&self, mirror: &Utf8Path) -> Result<(), SyncError>;

    /// Bring `mirror` to `revision`, discarding any local drift
    async fn update_to(&self, mirror: &Utf8Path, revision: &str) -> Result<(), SyncError>;
}

/// Git-backed catalog source pinned to one repository and branch
#[derive(Debug, Clone)]
pub struct GitCatalogSource {
    repo_url: String,
    branch: String,
    network_timeout: Duration,
}

impl GitCatalogSource {
    /// Create a source for `repo_url`, pinned to `branch`
    pub fn new(repo_url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch: branch.into(),
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }

    /// Override the bound on remote round trips
    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    /// Repository URL this source is pinned to
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    /// Branch this source is pinned to
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Run a git command. `remote` marks commands that touch the network:
    /// their failures and timeouts surface as `NetworkUnavailable` rather
    /// than `Git`.
    async fn run_git(&self, args: &[&str], remote: bool) -> Result<Output, SyncError> {
        debug!("Running: git {}", args.join(" "));
        // On timeout the output future is dropped; without kill_on_drop
        // the orphaned git would keep mutating the mirror behind us.
        let invocation = Command::new("git").kill_on_drop(true).args(args).output();

        let result = if remote {
            match tokio::time::timeout(self.network_timeout, invocation).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(SyncError::network_unavailable(format!(
                        "git {} timed out after {}s",
                        args.first().copied().unwrap_or("?"),
                        self.network_timeout.as_secs()
                    )))
                }
            }
        } else {
            invocation.await
        };

        let output =
            result.map_err(|e| SyncError::git(format!("failed to invoke git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(if remote {
                SyncError::network_unavailable(stderr)
            } else {
                SyncError::git(stderr)
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl CatalogSource for GitCatalogSource {
    async fn current_revision(&self, mirror: &Utf8Path) -> Result<String, SyncError> {
        let output = self
            .run_git(&["-C", mirror.as_str(), "rev-parse", "HEAD"], false)
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn remote_revision(&self) -> Result<String, SyncError> {
        let refspec = format!("refs/heads/{}", self.branch);
        let output = self
            .run_git(&["ls-remote", &self.repo_url, &refspec], true)
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| {
                SyncError::git(format!(
                    "branch {} not found on remote {}",
                    self.branch, self.repo_url
                ))
            })
    }

    async fn clone_to(&self, mirror: &Utf8Path) -> Result<(), SyncError> {
        if let Some(parent) = mirror.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let result = self
            .run_git(
                &[
                    "clone",
                    "--branch",
                    &self.branch,
                    "--single-branch",
                    &self.repo_url,
                    mirror.as_str(),
                ],
                true,
            )
            .await;

        if result.is_err() && mirror.exists() {
            // Never leave a partial clone behind; the next init must see
            // either a sound mirror or none at all.
            let _ = std::fs::remove_dir_all(mirror);
        }

        result.map(|_| ())
    }

    async fn update_to(&self, mirror: &Utf8Path, revision: &str) -> Result<(), SyncError> {
        self.run_git(
            &["-C", mirror.as_str(), "fetch", "origin", &self.branch],
            true,
        )
        .await?;
        // The mirror carries no local modifications, so a hard reset is a
        // plain fast-forward.
        self.run_git(
            &["-C", mirror.as_str(), "reset", "--hard", revision],
            false,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_is_pinned() {
        let source = GitCatalogSource::new("https://example.com/db.git", "kext_db");
        assert_eq!(source.repo_url(), "https://example.com/db.git");
        assert_eq!(source.branch(), "kext_db");
    }

    #[tokio::test]
    async fn test_local_git_failure_is_not_network_error() {
        let source = GitCatalogSource::new("https://example.com/db.git", "kext_db");
        let missing = Utf8Path::new("/nonexistent/mirror/path");
        let err = source.current_revision(missing).await.unwrap_err();
        assert!(matches!(err, SyncError::Git { .. }));
    }
}
