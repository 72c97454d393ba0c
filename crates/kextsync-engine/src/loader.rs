//! Catalog loader
//!
//! Parses the mirror's catalog file into the in-memory [`Catalog`].
//! All-or-nothing: a parse failure never leaves a partially populated
//! catalog behind. Runs without the mirror lock; the whole-file read
//! gives snapshot semantics against a concurrent updater.

use camino::Utf8Path;
use kextsync_core::{Catalog, CatalogFile, LoadError, CATALOG_FILE};
use std::io::ErrorKind;
use tracing::debug;

/// Load the catalog from the mirror at `db_path`.
///
/// # Errors
/// Returns [`LoadError::Malformed`] when the catalog file is absent or
/// structurally invalid.
pub fn load_catalog(db_path: &Utf8Path) -> Result<Catalog, LoadError> {
    let path = db_path.join(CATALOG_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LoadError::malformed(format!(
                "{CATALOG_FILE} missing from mirror at {db_path}"
            )))
        }
        Err(e) => return Err(e.into()),
    };

    let parsed: CatalogFile = serde_json::from_str(&raw)
        .map_err(|e| LoadError::malformed(format!("{CATALOG_FILE}: {e}")))?;

    debug!("Loaded {} catalog entries from {}", parsed.kexts.len(), path);
    Ok(parsed.kexts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn mirror_with(content: Option<&str>) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        if let Some(content) = content {
            std::fs::write(path.join(CATALOG_FILE), content).unwrap();
        }
        (tmp, path)
    }

    #[test]
    fn test_load_preserves_catalog_order() {
        let (_tmp, path) = mirror_with(Some(
            r#"{ "kexts": { "FooKext": { "remote": "kexts/Foo.zip" }, "BarKext": {} } }"#,
        ));
        let catalog = load_catalog(&path).unwrap();
        let names: Vec<_> = catalog.keys().cloned().collect();
        assert_eq!(names, vec!["FooKext", "BarKext"]);
    }

    #[test]
    fn test_missing_catalog_file_is_malformed() {
        let (_tmp, path) = mirror_with(None);
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains(CATALOG_FILE));
    }

    #[test]
    fn test_invalid_json_is_malformed_and_loads_nothing() {
        let (_tmp, path) = mirror_with(Some(r#"{ "kexts": { "FooKext": "#));
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_repeated_loads_are_value_equal() {
        let (_tmp, path) = mirror_with(Some(
            r#"{ "kexts": { "FooKext": { "pci_ids": ["8086:1234"] } } }"#,
        ));
        assert_eq!(load_catalog(&path).unwrap(), load_catalog(&path).unwrap());
    }
}
