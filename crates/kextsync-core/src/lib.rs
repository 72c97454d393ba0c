//! # kextsync-core
//!
//! Core library for the kextsync CLI providing:
//! - The error taxonomy shared by every engine phase (sync/load/scan)
//! - The location provider that maps the application identity to
//!   filesystem paths (mirror, caches, lock file, temp files)
//! - Catalog data types deserialized from the mirrored kext database

pub mod error;
pub mod locations;
pub mod types;

pub use error::{EngineError, Error, LoadError, Result, ScanError, SyncError};
pub use locations::Locations;
pub use types::{Catalog, CatalogEntry, CatalogFile, RemoteKextIndex, CATALOG_FILE};
