//! Host kext scanner
//!
//! Enumerates kext bundles present in the host's extension directories.
//! The one component that reads live OS state rather than cached data: it
//! re-scans on every call and never caches across calls. Names come back
//! lexically sorted and de-duplicated for stable output.

use camino::Utf8PathBuf;
use kextsync_core::ScanError;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use tracing::debug;

const KEXT_SUFFIX: &str = ".kext";

/// Default extension directories on a macOS host
pub const DEFAULT_EXTENSION_DIRS: &[&str] =
    &["/Library/Extensions", "/System/Library/Extensions"];

/// Scanner over a fixed set of extension directory roots
#[derive(Debug, Clone)]
pub struct HostKextScanner {
    roots: Vec<Utf8PathBuf>,
}

impl Default for HostKextScanner {
    fn default() -> Self {
        Self {
            roots: DEFAULT_EXTENSION_DIRS
                .iter()
                .map(Utf8PathBuf::from)
                .collect(),
        }
    }
}

impl HostKextScanner {
    /// Scanner over explicit roots (tests, non-standard layouts)
    pub fn with_roots(roots: Vec<Utf8PathBuf>) -> Self {
        Self { roots }
    }

    /// List installed kext names, lexically sorted, duplicates across
    /// roots collapsed.
    ///
    /// # Errors
    /// Returns [`ScanError::PermissionDenied`] when a root exists but the
    /// host refuses to enumerate it. Callers must treat that as "unknown
    /// installed set", never as an empty one. A missing root is skipped.
    pub fn list_installed(&self) -> Result<Vec<String>, ScanError> {
        let mut names = BTreeSet::new();
        for root in &self.roots {
            let entries = match std::fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    return Err(ScanError::permission_denied(root.as_str()))
                }
                Err(e) => return Err(e.into()),
            };
            for entry in entries {
                let entry = entry?;
                // Kexts are bundles: a plain file with the suffix is not one.
                if !entry.file_type()?.is_dir() {
                    continue;
                }
                let file_name = entry.file_name();
                let Some(name) = file_name.to_str() else {
                    continue;
                };
                if let Some(stem) = name.strip_suffix(KEXT_SUFFIX) {
                    if !stem.is_empty() {
                        names.insert(stem.to_string());
                    }
                }
            }
        }
        debug!("Found {} installed kexts", names.len());
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root_with(tmp: &TempDir, sub: &str, bundles: &[&str]) -> Utf8PathBuf {
        let root = Utf8PathBuf::from_path_buf(tmp.path().join(sub)).unwrap();
        std::fs::create_dir_all(&root).unwrap();
        for bundle in bundles {
            std::fs::create_dir_all(root.join(bundle)).unwrap();
        }
        root
    }

    #[test]
    fn test_scan_is_sorted_and_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let a = root_with(&tmp, "a", &["ZetaKext.kext", "AlphaKext.kext"]);
        let b = root_with(&tmp, "b", &["AlphaKext.kext", "MidKext.kext"]);
        let scanner = HostKextScanner::with_roots(vec![a, b]);
        assert_eq!(
            scanner.list_installed().unwrap(),
            vec!["AlphaKext", "MidKext", "ZetaKext"]
        );
    }

    #[test]
    fn test_non_kext_entries_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let root = root_with(&tmp, "exts", &["FooKext.kext", "notes.txt", ".kext"]);
        std::fs::write(root.join("README"), "not a kext").unwrap();
        // Suffix alone is not enough: bundles are directories.
        std::fs::write(root.join("FlatKext.kext"), "plain file").unwrap();
        let scanner = HostKextScanner::with_roots(vec![root]);
        assert_eq!(scanner.list_installed().unwrap(), vec!["FooKext"]);
    }

    #[test]
    fn test_missing_root_is_empty_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = Utf8PathBuf::from_path_buf(tmp.path().join("nope")).unwrap();
        let scanner = HostKextScanner::with_roots(vec![missing]);
        assert_eq!(scanner.list_installed().unwrap(), Vec::<String>::new());
    }

    #[cfg(unix)]
    #[test]
    fn test_denied_root_is_permission_denied_not_empty() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let root = root_with(&tmp, "locked", &["FooKext.kext"]);
        std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory permissions; only assert when the OS
        // actually denies the read.
        let denied = std::fs::read_dir(&root).is_err();
        if denied {
            let scanner = HostKextScanner::with_roots(vec![root.clone()]);
            let err = scanner.list_installed().unwrap_err();
            assert!(matches!(err, ScanError::PermissionDenied { .. }));
        }

        std::fs::set_permissions(&root, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}
