//! Mirror lock
//!
//! Every mirror-mutating operation runs inside a [`MirrorLock`]: an
//! exclusive advisory lock on the lock file, acquired with a bounded wait
//! and released on drop, so every exit path (including panics during the
//! mutation) releases it. The kernel drops advisory locks when the holder
//! process dies, so a crashed holder never deadlocks its successors; the
//! holder PID is written into the file for anyone inspecting a held lock.

use camino::{Utf8Path, Utf8PathBuf};
use fs4::fs_std::FileExt;
use kextsync_core::SyncError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// RAII guard over the mirror lock file
#[derive(Debug)]
pub struct MirrorLock {
    file: File,
    path: Utf8PathBuf,
}

impl MirrorLock {
    /// Acquire the lock at `path`, waiting up to `timeout`.
    ///
    /// # Errors
    /// Returns [`SyncError::LockTimeout`] when another holder keeps the
    /// lock for the whole wait; never silently proceeds without it.
    pub async fn acquire(path: &Utf8Path, timeout: Duration) -> Result<Self, SyncError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        let start = Instant::now();
        loop {
            if file.try_lock_exclusive()? {
                let _ = file.set_len(0);
                let _ = write!(file, "{}", std::process::id());
                let _ = file.flush();
                debug!("Acquired mirror lock at {}", path);
                return Ok(Self {
                    file,
                    path: path.to_owned(),
                });
            }
            if start.elapsed() >= timeout {
                return Err(SyncError::lock_timeout(path.as_str(), timeout.as_secs()));
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    /// Path of the lock file this guard holds
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for MirrorLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release mirror lock at {}: {}", self.path, e);
        } else {
            debug!("Released mirror lock at {}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lock_path(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().join("kext_db.lock")).unwrap()
    }

    #[tokio::test]
    async fn test_acquire_writes_holder_pid() {
        let tmp = TempDir::new().unwrap();
        let path = lock_path(&tmp);
        let lock = MirrorLock::acquire(&path, Duration::from_secs(1)).await.unwrap();
        let recorded = std::fs::read_to_string(lock.path()).unwrap();
        assert_eq!(recorded, std::process::id().to_string());
    }

    #[tokio::test]
    async fn test_bounded_wait_times_out_while_lock_is_held() {
        let tmp = TempDir::new().unwrap();
        let path = lock_path(&tmp);
        let _held = MirrorLock::acquire(&path, Duration::from_secs(1)).await.unwrap();

        // A second holder waits out its bound, then fails; never proceeds
        // without the lock.
        let err = MirrorLock::acquire(&path, Duration::from_millis(250))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::LockTimeout { .. }));
    }

    #[tokio::test]
    async fn test_release_on_drop_allows_reacquire() {
        let tmp = TempDir::new().unwrap();
        let path = lock_path(&tmp);
        {
            let _lock = MirrorLock::acquire(&path, Duration::from_secs(1)).await.unwrap();
        }
        // A second acquisition after drop must not time out.
        let _again = MirrorLock::acquire(&path, Duration::from_millis(300))
            .await
            .unwrap();
    }
}
