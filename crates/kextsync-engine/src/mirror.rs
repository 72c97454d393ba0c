//! Mirror synchronizer
//!
//! Owns the local mirror of the remote kext database: initial clone,
//! freshness checks, and recovery from corruption. All mutating entry
//! points take the mirror lock for their whole duration; read-only
//! consumers (the catalog loader) never need it.

use crate::lock::MirrorLock;
use crate::source::CatalogSource;
use camino::Utf8PathBuf;
use kextsync_core::{SyncError, CATALOG_FILE};
use std::time::Duration;
use tracing::{debug, info};

/// Default bound on waiting for the mirror lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Synchronizes the local kext database mirror against its remote source
#[derive(Debug)]
pub struct MirrorSynchronizer<S> {
    source: S,
    db_path: Utf8PathBuf,
    lock_path: Utf8PathBuf,
    lock_timeout: Duration,
}

impl<S: CatalogSource> MirrorSynchronizer<S> {
    /// Create a synchronizer for the mirror at `db_path`, guarded by the
    /// lock file at `lock_path`
    pub fn new(source: S, db_path: Utf8PathBuf, lock_path: Utf8PathBuf) -> Self {
        Self {
            source,
            db_path,
            lock_path,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override the bound on waiting for the mirror lock
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Path of the local mirror
    pub fn db_path(&self) -> &Utf8PathBuf {
        &self.db_path
    }

    /// Catalog source backing this synchronizer
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether a structurally sound mirror currently exists. The same
    /// check [`init_db`](Self::init_db) applies: a stray directory with a
    /// catalog file but no git working copy does not count.
    pub fn is_initialized(&self) -> bool {
        self.verify_structure().is_ok()
    }

    /// Ensure a valid local mirror exists, cloning it when absent.
    ///
    /// Idempotent: an existing structurally sound mirror is a success
    /// no-op. An existing unsound mirror surfaces as
    /// [`SyncError::Corrupt`] and is never deleted here; recovery goes
    /// through [`force_reinit`](Self::force_reinit).
    pub async fn init_db(&self) -> Result<(), SyncError> {
        let _lock = MirrorLock::acquire(&self.lock_path, self.lock_timeout).await?;

        if self.db_path.exists() {
            debug!("Mirror already present at {}", self.db_path);
            return self.verify_structure();
        }

        info!("Cloning kext database into {}", self.db_path);
        self.source.clone_to(&self.db_path).await?;
        self.verify_structure()
    }

    /// Compare the mirror against the remote branch tip and fast-forward
    /// it when they differ.
    ///
    /// Returns `true` when an update was applied, `false` when the mirror
    /// was already current. A remote failure leaves the mirror untouched
    /// and surfaces as [`SyncError::NetworkUnavailable`]; the last good
    /// mirror remains usable.
    pub async fn check_for_db_update(&self) -> Result<bool, SyncError> {
        let _lock = MirrorLock::acquire(&self.lock_path, self.lock_timeout).await?;

        if !self.db_path.exists() {
            return Err(SyncError::corrupt(
                self.db_path.as_str(),
                "mirror not initialized",
            ));
        }
        self.verify_structure()?;

        let local = self.source.current_revision(&self.db_path).await?;
        let remote = self.source.remote_revision().await?;
        if local == remote {
            debug!("Mirror already at remote revision {}", remote);
            return Ok(false);
        }

        info!("Updating mirror {} -> {}", local, remote);
        self.source.update_to(&self.db_path, &remote).await?;
        self.verify_structure()?;
        Ok(true)
    }

    /// Delete whatever is at the mirror path and clone from scratch.
    ///
    /// The documented recovery path for a corrupt mirror; only ever
    /// invoked on an explicit caller decision.
    pub async fn force_reinit(&self) -> Result<(), SyncError> {
        let _lock = MirrorLock::acquire(&self.lock_path, self.lock_timeout).await?;

        if self.db_path.exists() {
            info!("Discarding mirror at {}", self.db_path);
            std::fs::remove_dir_all(&self.db_path)?;
        }
        self.source.clone_to(&self.db_path).await?;
        self.verify_structure()
    }

    /// Basic structural soundness: the mirror is a git working copy and
    /// carries the top-level catalog file.
    fn verify_structure(&self) -> Result<(), SyncError> {
        if !self.db_path.join(".git").exists() {
            return Err(SyncError::corrupt(
                self.db_path.as_str(),
                "not a git working copy",
            ));
        }
        if !self.db_path.join(CATALOG_FILE).is_file() {
            return Err(SyncError::corrupt(
                self.db_path.as_str(),
                format!("missing {CATALOG_FILE}"),
            ));
        }
        Ok(())
    }
}
