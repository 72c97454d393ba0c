//! # kextsync-engine
//!
//! The catalog synchronization and resolution engine:
//! - [`mirror`] keeps a local git mirror of the remote kext database in
//!   sync, serialized across processes by an advisory file lock
//! - [`loader`] parses the mirror into an in-memory catalog
//! - [`scanner`] enumerates kexts installed on the host
//! - [`resolver`] reconciles catalog and host state into the display list
//!   and the remote-URL index
//! - [`engine`] ties the pieces together behind one value, [`KextEngine`]

pub mod engine;
pub mod loader;
pub mod lock;
pub mod mirror;
pub mod resolver;
pub mod scanner;
pub mod source;

pub use engine::{EngineConfig, KextEngine, MirrorStatus};
pub use lock::MirrorLock;
pub use mirror::MirrorSynchronizer;
pub use scanner::HostKextScanner;
pub use source::{CatalogSource, GitCatalogSource};

/// Upstream kext database repository
pub const DEFAULT_KEXT_REPO: &str = "https://github.com/MuntashirAkon/AdvanceKextUpdater.git";

/// Branch of the repository that carries the kext database
pub const DEFAULT_KEXT_BRANCH: &str = "kext_db";
