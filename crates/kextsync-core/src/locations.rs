//! Location provider
//!
//! Resolves every filesystem path the engine touches from a fixed
//! application identity: the application support root, the cache root, the
//! kext database mirror, the kext/guide/PCI-ID caches, the temp area, the
//! mirror lock file, and the stdio-redirection files used to capture
//! subprocess I/O.
//!
//! All directories are created once at construction time; the accessors
//! themselves are pure and infallible.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;

/// Application identity used to derive platform paths
pub const APP_NAME: &str = "kextsync";

/// Resolved filesystem locations for one application identity
#[derive(Debug, Clone)]
pub struct Locations {
    app: Utf8PathBuf,
    cache: Utf8PathBuf,
}

impl Locations {
    /// Resolve locations from the platform's standard directories
    /// (application data dir and cache dir for [`APP_NAME`]).
    ///
    /// # Errors
    /// Returns [`Error::PathUnavailable`] when no home/user context can be
    /// resolved, or an IO error if the directories cannot be created.
    pub fn resolve() -> Result<Self> {
        let data = data_dir().ok_or_else(|| {
            Error::path_unavailable("no application data directory for current user")
        })?;
        let cache = dirs::cache_dir()
            .ok_or_else(|| Error::path_unavailable("no cache directory for current user"))?;
        Self::from_roots(data.join(APP_NAME), cache.join(APP_NAME))
    }

    /// Resolve locations under an explicit root directory. Used by the
    /// `--db-root` CLI flag and by tests to keep all state in one place.
    pub fn with_root(root: impl AsRef<Utf8Path>) -> Result<Self> {
        let root = root.as_ref();
        Self::from_roots(
            root.join("data").into_std_path_buf(),
            root.join("cache").into_std_path_buf(),
        )
    }

    fn from_roots(app: PathBuf, cache: PathBuf) -> Result<Self> {
        let app = into_utf8(app)?;
        let cache = into_utf8(cache)?;
        let locations = Self { app, cache };
        for dir in [
            locations.app.clone(),
            locations.cache.clone(),
            locations.kext_cache_path(),
            locations.guide_cache_path(),
            locations.pci_ids_cache_path(),
            locations.tmp_path(),
            locations.kext_tmp_path(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(locations)
    }

    /// Application support root
    pub fn app_path(&self) -> &Utf8Path {
        &self.app
    }

    /// Cache root
    pub fn app_cache_path(&self) -> &Utf8Path {
        &self.cache
    }

    /// Local mirror of the remote kext database repository. Not created
    /// eagerly: the synchronizer clones into it and uses its absence to
    /// mean "not initialized".
    pub fn kext_db_path(&self) -> Utf8PathBuf {
        self.cache.join("kext_db")
    }

    /// Cache for downloaded kext artifacts
    pub fn kext_cache_path(&self) -> Utf8PathBuf {
        self.cache.join("kexts")
    }

    /// Cache for rendered guide content
    pub fn guide_cache_path(&self) -> Utf8PathBuf {
        self.cache.join("guides")
    }

    /// Cache for the PCI hardware ID database
    pub fn pci_ids_cache_path(&self) -> Utf8PathBuf {
        self.cache.join("pci_ids")
    }

    /// Scratch directory, kept on the same filesystem as the caches so
    /// renames into them stay atomic
    pub fn tmp_path(&self) -> Utf8PathBuf {
        self.cache.join("tmp")
    }

    /// Scratch directory for kext staging
    pub fn kext_tmp_path(&self) -> Utf8PathBuf {
        self.tmp_path().join("kexts")
    }

    /// Mirror lock file guarding all mirror-mutating operations
    pub fn lock_file(&self) -> Utf8PathBuf {
        self.app.join("kext_db.lock")
    }

    /// Stdin redirection file for subprocess I/O capture
    pub fn stdin_path(&self) -> Utf8PathBuf {
        self.tmp_path().join("stdin")
    }

    /// Stdout redirection file for subprocess I/O capture
    pub fn stdout_path(&self) -> Utf8PathBuf {
        self.tmp_path().join("stdout")
    }

    /// Stderr redirection file for subprocess I/O capture
    pub fn stderr_path(&self) -> Utf8PathBuf {
        self.tmp_path().join("stderr")
    }
}

/// Application data directory, preferring `$HOME` over the platform lookup.
///
/// `dirs::data_dir()` reads `/etc/passwd` on some platforms, which ignores
/// environment overrides used by containers and test harnesses.
fn data_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            #[cfg(target_os = "macos")]
            return Some(PathBuf::from(home).join("Library/Application Support"));
            #[cfg(not(target_os = "macos"))]
            return Some(PathBuf::from(home).join(".local/share"));
        }
    }
    dirs::data_dir()
}

fn into_utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|p| Error::path_unavailable(format!("non-UTF-8 path: {}", p.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Locations) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let locations = Locations::with_root(&root).unwrap();
        (tmp, locations)
    }

    #[test]
    fn test_with_root_creates_directories() {
        let (_tmp, locations) = fixture();
        assert!(locations.app_path().is_dir());
        assert!(locations.app_cache_path().is_dir());
        assert!(locations.kext_cache_path().is_dir());
        assert!(locations.guide_cache_path().is_dir());
        assert!(locations.pci_ids_cache_path().is_dir());
        assert!(locations.kext_tmp_path().is_dir());
    }

    #[test]
    fn test_mirror_path_not_created_eagerly() {
        let (_tmp, locations) = fixture();
        assert!(!locations.kext_db_path().exists());
    }

    #[test]
    fn test_accessors_are_deterministic() {
        let (_tmp, locations) = fixture();
        assert_eq!(locations.kext_db_path(), locations.kext_db_path());
        assert_eq!(locations.lock_file().parent().unwrap(), locations.app_path());
        assert_eq!(locations.stdin_path().parent(), locations.stdout_path().parent());
    }
}
