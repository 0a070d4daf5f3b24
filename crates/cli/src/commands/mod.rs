// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod enqueue;
pub mod list;
pub mod remove;
pub mod status;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rinse_core::{ActionQueue, QueueStore, SqliteKvStore};

use crate::config::{resolve_config_path, resolve_state_dir, Config};
use crate::error::Result;
use crate::sync::SyncEngine;

/// Queue database file inside the state directory.
pub const QUEUE_DB_FILE: &str = "queue.db";

/// Resolved configuration and state directory for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub state_dir: PathBuf,
}

impl Context {
    /// Resolve paths from flags and the environment, then load the config.
    pub fn load(config_flag: Option<&Path>, state_dir_flag: Option<&Path>) -> Result<Self> {
        let config = match resolve_config_path(config_flag) {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };
        let state_dir = resolve_state_dir(state_dir_flag)?;
        Ok(Context::new(config, state_dir))
    }

    pub fn new(config: Config, state_dir: impl Into<PathBuf>) -> Self {
        Context {
            config,
            state_dir: state_dir.into(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.state_dir.join(QUEUE_DB_FILE)
    }

    /// Open the persistent queue, creating the database if needed.
    pub fn open_queue(&self) -> Result<Arc<ActionQueue>> {
        std::fs::create_dir_all(&self.state_dir)?;
        let kv = Arc::new(SqliteKvStore::open(&self.db_path())?);
        let store = QueueStore::with_key(kv, self.config.queue.storage_key.clone());
        Ok(Arc::new(ActionQueue::open(store, self.config.policy())))
    }

    /// Engine over `queue` with the configured backend, credentials and headers.
    pub fn engine(&self, queue: Arc<ActionQueue>) -> SyncEngine {
        let backend = &self.config.backend;
        let mut engine = SyncEngine::new(queue, &backend.base_url, self.config.credentials());
        for (name, value) in &backend.headers {
            engine = engine.with_default_header(name, value.clone());
        }
        engine
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
