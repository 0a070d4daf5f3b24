// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent queue store.
//!
//! The whole action list is serialized as one JSON document under a single
//! key:
//!
//! ```json
//! {"version": 1, "actions": [ ... ]}
//! ```
//!
//! A bare JSON array (the unversioned layout) is still accepted on load and
//! rewritten in the versioned form on the next save.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::QueuedAction;
use crate::error::{Error, Result};
use crate::kv::KeyValueStore;

/// Current version of the persisted envelope.
pub const STORE_VERSION: u32 = 1;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "offline_queue";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    actions: &'a [QueuedAction],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
    Envelope {
        version: u32,
        actions: Vec<QueuedAction>,
    },
    Legacy(Vec<QueuedAction>),
}

/// Durable home of the action list.
///
/// This is the only component that performs I/O for the queue.
pub struct QueueStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl QueueStore {
    /// Bind a store to the default storage key.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    /// Bind a store to a custom storage key.
    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        QueueStore { kv, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted list.
    ///
    /// Missing, unreadable, or corrupt data yields an empty list; the cause
    /// is logged.
    pub fn load(&self) -> Vec<QueuedAction> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read offline queue");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable offline queue");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted list.
    pub fn save(&self, actions: &[QueuedAction]) -> Result<()> {
        let json = encode(actions)?;
        self.kv.set(&self.key, &json)
    }
}

/// Serialize actions into the versioned envelope.
pub fn encode(actions: &[QueuedAction]) -> Result<String> {
    let envelope = EnvelopeRef {
        version: STORE_VERSION,
        actions,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a persisted payload in either the versioned or legacy layout.
pub fn decode(raw: &str) -> Result<Vec<QueuedAction>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let persisted: Persisted =
        serde_json::from_str(raw).map_err(|e| Error::CorruptedData(e.to_string()))?;

    match persisted {
        Persisted::Envelope { version, actions } if version == STORE_VERSION => Ok(actions),
        Persisted::Envelope { version, .. } => Err(Error::UnsupportedVersion(version)),
        Persisted::Legacy(actions) => Ok(actions),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
