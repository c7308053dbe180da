use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Exclusive writer lock over a library's `recall/` directory.
///
/// Mutating commands hold one of these across their whole
/// load-mutate-save window so two `rcl` processes sharing a library
/// cannot interleave writes to library.json. Readers never take it.
/// Backed by an advisory flock on `recall/.lock`; releasing is dropping.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    lock_path: PathBuf,
}

/// Error type for writer-lock acquisition
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("library is busy: another rcl process held {path} for over {wait:?}")]
    Busy { path: PathBuf, wait: Duration },
    #[error("lock error: {0}")]
    Io(#[from] io::Error),
}

impl StoreLock {
    /// Take the writer lock, polling until `wait` has elapsed.
    pub fn acquire(recall_dir: &Path, wait: Duration) -> Result<StoreLock, LockError> {
        let lock_path = recall_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;

        let deadline = Instant::now() + wait;
        while flock_exclusive(&file).is_err() {
            if Instant::now() >= deadline {
                return Err(LockError::Busy {
                    path: lock_path,
                    wait,
                });
            }
            std::thread::sleep(Duration::from_millis(25));
        }
        Ok(StoreLock { file, lock_path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        flock_release(&self.file);
        let _ = std::fs::remove_file(&self.lock_path);
    }
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    match unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) } {
        0 => Ok(()),
        _ => Err(io::Error::last_os_error()),
    }
}

#[cfg(unix)]
fn flock_release(file: &File) {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

// Locking degrades to a no-op where flock is unavailable; single-user
// libraries on such platforms lose only cross-process write protection.
#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn flock_release(_file: &File) {}
