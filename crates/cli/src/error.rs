// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::TransportError;

/// Errors surfaced by the rinse command-line front end.
///
/// Messages carry a `hint:` line where the user can act on them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid header '{0}'\n  hint: headers are written as NAME:VALUE")]
    InvalidHeader(String),

    #[error("invalid body: {0}\n  hint: --body takes a JSON document, e.g. '{{\"status\":\"ready\"}}'")]
    InvalidBody(String),

    #[error("action not found: {0}\n  hint: run 'rinse list' to see queued action IDs")]
    ActionNotFound(String),

    #[error("another 'rinse watch' is already draining {0}")]
    AlreadyWatching(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Core(#[from] rinse_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rinse CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
