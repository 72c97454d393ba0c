//! Engine facade
//!
//! [`KextEngine`] is the explicit value that replaces the original
//! design's class-level mutable state: it owns the resolved locations,
//! the mirror synchronizer, the host scanner, and a generation-keyed
//! catalog cache, and is threaded through calls instead of living in
//! hidden globals.
//!
//! A successful mirror update bumps the in-process mirror generation,
//! which invalidates the cached catalog; the next load re-parses the
//! mirror. Cross-process freshness needs no extra marker: it derives
//! from the mirror's own git revision.

use crate::loader::load_catalog;
use crate::mirror::{MirrorSynchronizer, DEFAULT_LOCK_TIMEOUT};
use crate::resolver;
use crate::scanner::HostKextScanner;
use crate::source::{CatalogSource, GitCatalogSource, DEFAULT_NETWORK_TIMEOUT};
use crate::{DEFAULT_KEXT_BRANCH, DEFAULT_KEXT_REPO};
use kextsync_core::{
    Catalog, EngineError, Error, LoadError, Locations, RemoteKextIndex, ScanError, SyncError,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Engine configuration: remote identity and timeout policy
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Clone URL of the kext database repository
    pub repo_url: String,
    /// Branch carrying the kext database
    pub branch: String,
    /// Bound on waiting for the mirror lock
    pub lock_timeout: Duration,
    /// Bound on remote round trips
    pub network_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_KEXT_REPO.to_string(),
            branch: DEFAULT_KEXT_BRANCH.to_string(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }
}

/// Snapshot of the mirror for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct MirrorStatus {
    /// Local mirror path
    pub db_path: String,
    /// Whether a structurally sound mirror exists
    pub initialized: bool,
    /// Revision the mirror is currently at, when resolvable
    pub revision: Option<String>,
    /// Number of catalog entries, when the catalog loads
    pub catalog_entries: Option<usize>,
}

/// Catalog synchronization and resolution engine
pub struct KextEngine<S = GitCatalogSource> {
    locations: Locations,
    sync: MirrorSynchronizer<S>,
    scanner: HostKextScanner,
    raw_root: url::Url,
    generation: AtomicU64,
    loaded: Mutex<Option<(u64, Catalog)>>,
}

impl KextEngine<GitCatalogSource> {
    /// Create an engine over the given locations and configuration
    pub fn new(locations: Locations, config: EngineConfig) -> Result<Self, Error> {
        let raw_root = resolver::raw_content_root(&config.repo_url, &config.branch)?;
        let source = GitCatalogSource::new(&config.repo_url, &config.branch)
            .with_network_timeout(config.network_timeout);
        let sync = MirrorSynchronizer::new(source, locations.kext_db_path(), locations.lock_file())
            .with_lock_timeout(config.lock_timeout);
        Ok(Self {
            locations,
            sync,
            scanner: HostKextScanner::default(),
            raw_root,
            generation: AtomicU64::new(0),
            loaded: Mutex::new(None),
        })
    }
}

impl<S: CatalogSource> KextEngine<S> {
    /// Assemble an engine from explicit parts (tests, alternate sources)
    pub fn from_parts(
        locations: Locations,
        sync: MirrorSynchronizer<S>,
        scanner: HostKextScanner,
        raw_root: url::Url,
    ) -> Self {
        Self {
            locations,
            sync,
            scanner,
            raw_root,
            generation: AtomicU64::new(0),
            loaded: Mutex::new(None),
        }
    }

    /// Resolved filesystem locations this engine operates on
    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    /// Ensure a valid local mirror exists. Idempotent; see
    /// [`MirrorSynchronizer::init_db`].
    pub async fn init_db(&self) -> Result<(), SyncError> {
        self.sync.init_db().await
    }

    /// Refresh the mirror against the remote; `true` when an update was
    /// applied. A reported update invalidates any loaded catalog.
    pub async fn check_for_db_update(&self) -> Result<bool, SyncError> {
        let updated = self.sync.check_for_db_update().await?;
        if updated {
            self.invalidate();
        }
        Ok(updated)
    }

    /// Discard the mirror and clone from scratch; the documented recovery
    /// path for a corrupt mirror
    pub async fn force_reinit(&self) -> Result<(), SyncError> {
        self.sync.force_reinit().await?;
        self.invalidate();
        Ok(())
    }

    /// Load the catalog from the mirror, cached per mirror generation
    pub fn load_catalog(&self) -> Result<Catalog, LoadError> {
        let generation = self.generation.load(Ordering::Acquire);
        {
            let cached = self.loaded.lock().expect("catalog cache poisoned");
            if let Some((cached_generation, catalog)) = cached.as_ref() {
                if *cached_generation == generation {
                    return Ok(catalog.clone());
                }
            }
        }

        let catalog = load_catalog(self.sync.db_path())?;
        let mut cached = self.loaded.lock().expect("catalog cache poisoned");
        *cached = Some((generation, catalog.clone()));
        Ok(catalog)
    }

    /// Enumerate kexts installed on the host; never cached
    pub fn list_installed_kexts(&self) -> Result<Vec<String>, ScanError> {
        self.scanner.list_installed()
    }

    /// The known-kext display list: installed names first, then
    /// catalog-only entries, de-duplicated
    pub fn list_kexts(&self) -> Result<Vec<String>, EngineError> {
        let installed = self.list_installed_kexts()?;
        let catalog = self.load_catalog()?;
        Ok(resolver::known_kexts(&installed, &catalog))
    }

    /// Remote download index for kexts with a fetchable artifact; keys are
    /// always a subset of [`list_kexts`](Self::list_kexts)
    pub fn list_remote_kexts(&self) -> Result<RemoteKextIndex, EngineError> {
        let installed = self.list_installed_kexts()?;
        let catalog = self.load_catalog()?;
        let known = resolver::known_kexts(&installed, &catalog);
        Ok(resolver::remote_kexts(&known, &catalog, &self.raw_root))
    }

    /// Report the mirror's current state for status display
    pub async fn status(&self) -> MirrorStatus {
        let db_path = self.sync.db_path().clone();
        let initialized = self.sync.is_initialized();
        let revision = if initialized {
            self.sync.source().current_revision(&db_path).await.ok()
        } else {
            None
        };
        let catalog_entries = if initialized {
            self.load_catalog().ok().map(|c| c.len())
        } else {
            None
        };
        MirrorStatus {
            db_path: db_path.into_string(),
            initialized,
            revision,
            catalog_entries,
        }
    }

    /// Current mirror generation; bumped on every applied update
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let mut cached = self.loaded.lock().expect("catalog cache poisoned");
        *cached = None;
    }
}
