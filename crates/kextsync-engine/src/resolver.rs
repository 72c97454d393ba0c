//! Reconciliation resolver
//!
//! Merges the host scan with the loaded catalog: the known-kext display
//! list (installed names first, then catalog-only names in catalog order,
//! de-duplicated) and the remote index mapping each fetchable kext to an
//! absolute download URL.

use kextsync_core::{Catalog, Error, RemoteKextIndex};
use std::collections::HashSet;
use tracing::warn;
use url::Url;

const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Union of installed and cataloged kext names, first-seen order:
/// installed kexts first (scan order), then catalog-only entries.
pub fn known_kexts(installed: &[String], catalog: &Catalog) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut names = Vec::with_capacity(installed.len() + catalog.len());
    for name in installed {
        if seen.insert(name) {
            names.push(name.clone());
        }
    }
    for name in catalog.keys() {
        if seen.insert(name) {
            names.push(name.clone());
        }
    }
    names
}

/// Remote download index for every known kext with a fetchable artifact.
///
/// Absolute references are kept as-is; relative ones are joined against
/// `raw_root`. Installed-but-uncataloged names get no entry, so the index
/// keys are always a subset of [`known_kexts`].
pub fn remote_kexts(known: &[String], catalog: &Catalog, raw_root: &Url) -> RemoteKextIndex {
    let mut index = RemoteKextIndex::new();
    for name in known {
        let Some(entry) = catalog.get(name) else {
            continue;
        };
        let Some(reference) = &entry.remote else {
            continue;
        };
        match resolve_reference(reference, raw_root) {
            Ok(url) => {
                index.insert(name.clone(), url);
            }
            Err(e) => warn!("Skipping remote for {}: unresolvable reference {reference:?}: {e}", name),
        }
    }
    index
}

fn resolve_reference(reference: &str, raw_root: &Url) -> Result<Url, url::ParseError> {
    match Url::parse(reference) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => raw_root.join(reference),
        Err(e) => Err(e),
    }
}

/// Root URL that relative catalog references resolve against, derived
/// from the repository URL and database branch. GitHub repositories map
/// to their raw-content host; anything else falls back to the forge's
/// `/raw/<branch>/` convention.
pub fn raw_content_root(repo_url: &str, branch: &str) -> Result<Url, Error> {
    // Normalize scp-style GitHub remotes before parsing.
    let normalized = repo_url
        .strip_prefix("git@github.com:")
        .map(|path| format!("https://github.com/{path}"))
        .unwrap_or_else(|| repo_url.to_string());
    let trimmed = normalized.trim_end_matches('/').trim_end_matches(".git");

    let parsed = Url::parse(trimmed).map_err(|_| Error::invalid_repo_url(repo_url))?;
    let root = if parsed.host_str() == Some("github.com") {
        let repo_path = parsed.path().trim_matches('/');
        format!("{GITHUB_RAW_URL}/{repo_path}/{branch}/")
    } else {
        format!("{trimmed}/raw/{branch}/")
    };
    Url::parse(&root).map_err(|_| Error::invalid_repo_url(repo_url))
}
