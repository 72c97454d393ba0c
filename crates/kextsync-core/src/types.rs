//! Catalog data types
//!
//! The mirrored kext database carries a single authoritative file,
//! [`CATALOG_FILE`], at the mirror root. It deserializes into a
//! [`CatalogFile`], whose `kexts` map is the in-memory [`Catalog`]. A
//! catalog is immutable for the lifetime of one load and replaced
//! wholesale on the next successful refresh.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Name of the catalog data file at the mirror root. Its presence is the
/// structural soundness check for an existing mirror.
pub const CATALOG_FILE: &str = "catalog.json";

/// One record per known kext
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Relative path into the mirror's guide content, when a guide exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,

    /// PCI hardware IDs covered by this kext, for capability matching
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pci_ids: Vec<String>,

    /// Remote artifact reference: an absolute URL, or a path resolved
    /// against the catalog's raw content root. Absent for kexts with no
    /// fetchable artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

/// On-disk shape of [`CATALOG_FILE`]
///
/// Entries keep the catalog file's own order: the display list shows
/// catalog-only kexts in the order the database defines them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Kext name (unique, stable identifier) to its catalog entry
    pub kexts: IndexMap<String, CatalogEntry>,
}

/// In-memory catalog: kext name to entry, built once per load cycle,
/// iteration order = catalog definition order
pub type Catalog = IndexMap<String, CatalogEntry>;

/// Kext name to resolved remote download URL. Only names with a known
/// remote artifact appear; always a subset of the known-kext list.
pub type RemoteKextIndex = BTreeMap<String, Url>;
