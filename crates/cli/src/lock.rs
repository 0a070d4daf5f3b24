// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory file locks in the state directory.
//!
//! - `queue.lock` serializes writers to the queue database across processes.
//!   One-shot commands hold it for their whole run; `rinse watch` takes it
//!   around each sync pass.
//! - `watch.lock` keeps a second `rinse watch` off the same state directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};
use crate::sync::PassLock;

pub const QUEUE_LOCK_FILE: &str = "queue.lock";
pub const WATCH_LOCK_FILE: &str = "watch.lock";

/// Held lock; released when dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
}

fn open_lock_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
}

/// Block until the queue lock is ours.
pub fn lock_queue(state_dir: &Path) -> std::io::Result<LockGuard> {
    let file = open_lock_file(&state_dir.join(QUEUE_LOCK_FILE))?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}

/// Take the watch lock or fail if another watcher holds it.
pub fn try_lock_watch(state_dir: &Path) -> Result<LockGuard> {
    let file = open_lock_file(&state_dir.join(WATCH_LOCK_FILE))?;
    file.try_lock_exclusive()
        .map_err(|_| Error::AlreadyWatching(state_dir.display().to_string()))?;
    Ok(LockGuard { _file: file })
}

/// [`PassLock`] backed by `queue.lock`.
#[derive(Debug, Clone)]
pub struct QueueFileLock {
    state_dir: PathBuf,
}

impl QueueFileLock {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        QueueFileLock {
            state_dir: state_dir.into(),
        }
    }
}

impl PassLock for QueueFileLock {
    fn acquire(&self) -> std::io::Result<Box<dyn Send>> {
        Ok(Box::new(lock_queue(&self.state_dir)?))
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
