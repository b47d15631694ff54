//! Exclusive writer lock for a journey directory.
//!
//! Ingestion assumes a single writer per store. The lock file holds the
//! owner's PID; a lock left behind by a dead process is removed and
//! re-acquired.

use crate::error::{JourneyError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// RAII guard for the writer lock.
///
/// Releases the file lock and removes the lock file when dropped.
#[derive(Debug)]
pub struct WriterLock {
    file: Option<File>,
    path: PathBuf,
}

impl WriterLock {
    /// Acquires the lock at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreLockHeld` when a live process owns the lock and
    /// `StoreLocked` when the lock cannot be taken for another reason.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        acquire_with_retry(path.as_ref(), 0)
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
        }
        let _ = fs::remove_file(&self.path);
    }
}

fn acquire_with_retry(path: &Path, retry_count: u32) -> Result<WriterLock> {
    if retry_count > 2 {
        return Err(JourneyError::StoreLocked);
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            writeln!(file, "{}", std::process::id())?;
            file.flush()?;
            file.try_lock_exclusive()
                .map_err(|_| JourneyError::StoreLocked)?;

            Ok(WriterLock {
                file: Some(file),
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            handle_existing_lock(path, retry_count)
        }
        Err(e) => Err(JourneyError::Io(e)),
    }
}

fn handle_existing_lock(path: &Path, retry_count: u32) -> Result<WriterLock> {
    match fs::read_to_string(path) {
        Ok(content) => {
            if let Ok(pid) = content.trim().parse::<u32>() {
                if pid == std::process::id() || is_process_alive(pid) {
                    return Err(JourneyError::StoreLockHeld { pid });
                }

                warn!(pid, "removing stale journey lock from dead process");
                if let Err(e) = fs::remove_file(path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        return Err(JourneyError::Io(e));
                    }
                }
                return acquire_with_retry(path, retry_count + 1);
            }

            warn!("journey lock file has invalid content, attempting cleanup");
            let _ = fs::remove_file(path);
            acquire_with_retry(path, retry_count + 1)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            acquire_with_retry(path, retry_count + 1)
        }
        Err(_) => Err(JourneyError::StoreLocked),
    }
}

#[cfg(target_os = "linux")]
fn is_process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}/stat", pid)).exists()
}

#[cfg(all(unix, not(target_os = "linux")))]
fn is_process_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(true)
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    true
}
