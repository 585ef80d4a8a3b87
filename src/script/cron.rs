//! Advisory single-instance lock for recurring scripts
//!
//! Prevents two instances of the same cron script from running concurrently
//! on one host. Cooperative file-system mutual exclusion only: processes on
//! other hosts are not coordinated.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use fs2::FileExt;

use crate::core::{AppError, AppResult};

/// Advisory execution lock keyed by script identifier.
///
/// The lock file name is derived deterministically from the identifier and
/// placed in the shared temporary-file area. Acquisition takes a blocking
/// exclusive lock; the OS bounds the wait, no timeout is imposed here.
pub struct CronGuard {
    use_lock: bool,
    lock_dir: PathBuf,
    lock_file: Option<File>,
}

impl CronGuard {
    pub fn new(use_lock: bool) -> Self {
        Self {
            use_lock,
            lock_dir: std::env::temp_dir(),
            lock_file: None,
        }
    }

    pub fn use_lock(&self) -> bool {
        self.use_lock
    }

    pub fn set_use_lock(&mut self, use_lock: bool) -> &mut Self {
        self.use_lock = use_lock;
        self
    }

    /// Override the directory holding lock files.
    pub fn set_lock_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.lock_dir = dir.into();
        self
    }

    /// Path of the lock file for a script identifier.
    pub fn lock_path(&self, script_ident: &str) -> PathBuf {
        let name = script_ident
            .replace("::", "-")
            .replace(['/', '\\'], "-");
        self.lock_dir.join(format!("{name}.lock"))
    }

    /// Take the exclusive lock for the given script identifier, creating
    /// the lock file if absent. Blocks until the OS grants or refuses the
    /// lock. A failure to open or lock is fatal to this script run.
    ///
    /// No-op when locking is disabled, or when this guard already holds a
    /// lock.
    pub fn acquire(&mut self, script_ident: &str) -> AppResult<()> {
        if !self.use_lock || self.lock_file.is_some() {
            return Ok(());
        }

        let path = self.lock_path(script_ident);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                AppError::Lock(format!(
                    "Can not run script. Lock file {} not available: {e}",
                    path.display()
                ))
            })?;

        file.lock_exclusive().map_err(|e| {
            AppError::Lock(format!(
                "Can not run script. Lock on {} not available: {e}",
                path.display()
            ))
        })?;

        self.lock_file = Some(file);
        Ok(())
    }

    /// Unlock and close the handle if one was acquired. Safe to call even
    /// if `acquire` was never called, and idempotent.
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            if let Err(e) = fs2::FileExt::unlock(&file) {
                log::warn!("Failed to release cron lock: {e}");
            }
        }
    }
}

impl Drop for CronGuard {
    fn drop(&mut self) {
        self.release();
    }
}
