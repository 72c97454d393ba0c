//! Error types for kextsync-core
//!
//! Each engine phase has its own error enum so a failure always names the
//! phase it came from: `SyncError` (mirror synchronization), `LoadError`
//! (catalog parsing), `ScanError` (host enumeration). `EngineError` is the
//! union used by operations that span phases.

use thiserror::Error;

/// Result type alias using kextsync-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving application paths and configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The OS user/home-directory context cannot be resolved
    #[error("Cannot resolve application paths: {reason}")]
    PathUnavailable { reason: String },

    /// The catalog repository URL cannot be interpreted
    #[error("Invalid catalog repository URL: {url}")]
    InvalidRepoUrl { url: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a path-unavailable error
    pub fn path_unavailable(reason: impl Into<String>) -> Self {
        Self::PathUnavailable {
            reason: reason.into(),
        }
    }

    /// Create an invalid repository URL error
    pub fn invalid_repo_url(url: impl Into<String>) -> Self {
        Self::InvalidRepoUrl { url: url.into() }
    }
}

/// Errors raised by the mirror synchronizer
#[derive(Error, Debug)]
pub enum SyncError {
    /// A mirror directory exists but fails the structural soundness check.
    /// Never auto-repaired; recovery (delete and re-clone) is an explicit
    /// caller decision.
    #[error("Kext database mirror at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    /// The remote catalog repository is unreachable. Non-fatal: the last
    /// good local mirror remains usable.
    #[error("Remote catalog unreachable: {detail}")]
    NetworkUnavailable { detail: String },

    /// The mirror lock could not be acquired within the bounded wait
    #[error("Timed out after {waited_secs}s waiting for mirror lock at {path}")]
    LockTimeout { path: String, waited_secs: u64 },

    /// A local git operation failed
    #[error("Git operation failed: {detail}")]
    Git { detail: String },

    /// IO error during synchronization
    #[error("IO error during sync: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create a corrupt-mirror error
    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a network-unavailable error
    pub fn network_unavailable(detail: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            detail: detail.into(),
        }
    }

    /// Create a lock-timeout error
    pub fn lock_timeout(path: impl Into<String>, waited_secs: u64) -> Self {
        Self::LockTimeout {
            path: path.into(),
            waited_secs,
        }
    }

    /// Create a git-operation error
    pub fn git(detail: impl Into<String>) -> Self {
        Self::Git {
            detail: detail.into(),
        }
    }
}

/// Errors raised by the catalog loader
#[derive(Error, Debug)]
pub enum LoadError {
    /// The mirror's catalog data is structurally invalid. The in-memory
    /// catalog is never partially populated.
    #[error("Malformed catalog data: {detail}")]
    Malformed { detail: String },

    /// IO error while reading catalog data
    #[error("IO error while loading catalog: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Create a malformed-data error
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}

/// Errors raised by the host kext scanner
#[derive(Error, Debug)]
pub enum ScanError {
    /// The host denied the enumeration call. Distinct from "no kexts
    /// installed": callers must treat this as an unknown installed set.
    #[error("Permission denied enumerating kexts under {path}")]
    PermissionDenied { path: String },

    /// IO error during host enumeration
    #[error("IO error while scanning installed kexts: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Create a permission-denied error
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }
}

/// Union error for operations that span sync, load, and scan phases
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("sync phase failed: {0}")]
    Sync(#[from] SyncError),

    #[error("load phase failed: {0}")]
    Load(#[from] LoadError),

    #[error("scan phase failed: {0}")]
    Scan(#[from] ScanError),
}
