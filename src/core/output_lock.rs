//! Mutual exclusion around console output
//!
//! Every [`StreamHandler`](crate::handlers::StreamHandler) in the process
//! serializes its writes through one static mutex, so replacing a handler
//! never races with a write still in flight on the old one. With the
//! `process-lock` feature a handler can additionally hold an exclusive
//! advisory lock on a file for the duration of each write, which extends the
//! exclusion to other processes writing to the same terminal.

use super::error::Result;
use parking_lot::{Mutex, MutexGuard};

#[cfg(feature = "process-lock")]
use super::error::LoggerError;
#[cfg(feature = "process-lock")]
use std::fs::{File, OpenOptions};
#[cfg(feature = "process-lock")]
use std::path::{Path, PathBuf};

static OUTPUT_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Per-handler view of the shared output lock
#[derive(Debug, Default)]
pub struct OutputLock {
    #[cfg(feature = "process-lock")]
    process: Option<Mutex<ProcessLock>>,
    #[cfg(feature = "process-lock")]
    lock_path: Option<PathBuf>,
}

impl OutputLock {
    /// Intra-process exclusion only
    pub fn shared() -> Self {
        Self::default()
    }

    /// Also take an exclusive lock on `path` while writing
    #[cfg(feature = "process-lock")]
    pub fn with_lock_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        Ok(Self {
            process: Some(Mutex::new(ProcessLock::open(path.clone())?)),
            lock_path: Some(path),
        })
    }

    /// Block until this process, and any process sharing the lock file, may write.
    ///
    /// The returned guard releases everything it took when dropped, including
    /// while unwinding.
    pub fn acquire(&self) -> Result<OutputGuard<'_>> {
        let thread = OUTPUT_LOCK.lock();

        #[cfg(feature = "process-lock")]
        let process = match &self.process {
            Some(lock) => {
                let mut held = lock.lock();
                // on failure `thread` is dropped here and the mutex released
                held.lock()?;
                Some(held)
            }
            None => None,
        };

        Ok(OutputGuard {
            #[cfg(feature = "process-lock")]
            process,
            _thread: thread,
            #[cfg(not(feature = "process-lock"))]
            _handler: std::marker::PhantomData,
        })
    }

    #[cfg(feature = "process-lock")]
    pub fn lock_file(&self) -> Option<&Path> {
        self.lock_path.as_deref()
    }
}

/// Held for the duration of one write; fields drop in declaration order,
/// so the file lock goes before the process-wide mutex.
pub struct OutputGuard<'a> {
    #[cfg(feature = "process-lock")]
    process: Option<MutexGuard<'a, ProcessLock>>,
    _thread: MutexGuard<'static, ()>,
    #[cfg(not(feature = "process-lock"))]
    _handler: std::marker::PhantomData<&'a ()>,
}

impl OutputGuard<'_> {
    #[cfg(feature = "process-lock")]
    fn release_process_lock(&mut self) {
        if let Some(process) = self.process.as_mut() {
            process.unlock();
        }
    }

    #[cfg(not(feature = "process-lock"))]
    fn release_process_lock(&mut self) {}
}

impl Drop for OutputGuard<'_> {
    fn drop(&mut self) {
        self.release_process_lock();
    }
}

#[cfg(feature = "process-lock")]
#[derive(Debug)]
struct ProcessLock {
    path: PathBuf,
    file: File,
    owner_pid: u32,
}

#[cfg(feature = "process-lock")]
impl ProcessLock {
    fn open(path: PathBuf) -> Result<Self> {
        let file = Self::open_file(&path)?;
        Ok(Self {
            path,
            file,
            owner_pid: std::process::id(),
        })
    }

    fn open_file(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::lock(path.display().to_string(), e))
    }

    fn lock(&mut self) -> Result<()> {
        // A forked child shares the parent's open file description, and with
        // it the parent's flock. Reopen so each process locks independently.
        let pid = std::process::id();
        if pid != self.owner_pid {
            self.file = Self::open_file(&self.path)?;
            self.owner_pid = pid;
        }
        fs2::FileExt::lock_exclusive(&self.file)
            .map_err(|e| LoggerError::lock(self.path.display().to_string(), e))
    }

    fn unlock(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_separate_handlers_share_one_lock() {
        let first = OutputLock::shared();
        let second = OutputLock::shared();
        let inside = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for lock in [&first, &second, &first, &second] {
                let inside = Arc::clone(&inside);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let _guard = lock.acquire().unwrap();
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });
    }

    #[test]
    fn test_guard_released_on_unwind() {
        let lock = OutputLock::shared();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = lock.acquire().unwrap();
            panic!("interrupted while holding the lock");
        }));
        assert!(result.is_err());
        drop(lock.acquire().unwrap());
    }

    #[cfg(feature = "process-lock")]
    #[test]
    fn test_lock_file_is_created_and_reusable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("console.lock");
        let lock = OutputLock::with_lock_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(lock.lock_file(), Some(path.as_path()));

        for _ in 0..3 {
            let _guard = lock.acquire().unwrap();
        }
    }

    #[cfg(feature = "process-lock")]
    #[test]
    fn test_unopenable_lock_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("console.lock");
        let err = OutputLock::with_lock_file(&path).unwrap_err();
        assert!(matches!(err, LoggerError::LockError { .. }));
    }
}
