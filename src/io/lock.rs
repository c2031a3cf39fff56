use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a writer waits for another process before giving up
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("gave up after {waited:?} waiting for {path}: another np process holds the to-do file")]
    Busy { path: PathBuf, waited: Duration },
}

/// Exclusive hold on the to-do file for one read-modify-write.
///
/// Taken before `todo.json` is read and dropped after the replacement is
/// renamed into place, so two writers can never both start from the same
/// contents. The lock file itself stays on disk; only the flock on its
/// open handle is released.
#[derive(Debug)]
pub struct WriteGuard {
    file: File,
    path: PathBuf,
}

impl WriteGuard {
    /// Block on `lock_path` for at most `timeout`
    pub fn acquire(lock_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|source| LockError::Open {
                path: lock_path.to_path_buf(),
                source,
            })?;

        let started = Instant::now();
        while !flock_exclusive(&file) {
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(LockError::Busy {
                    path: lock_path.to_path_buf(),
                    waited,
                });
            }
            std::thread::sleep(RETRY_INTERVAL.min(timeout - waited));
        }
        Ok(WriteGuard {
            file,
            path: lock_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        unlock(&self.file);
    }
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> bool {
    true
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}
