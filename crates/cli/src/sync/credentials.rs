// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Credential providers.
//!
//! The sync engine asks for a token before every replayed action, so a
//! token refreshed mid-pass is picked up by the next request.

use std::path::{Path, PathBuf};

/// Source of the bearer token attached to replayed requests.
pub trait CredentialProvider: Send + Sync {
    /// The token to use right now, or `None` to send unauthenticated.
    fn current_token(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn current_token(&self) -> Option<String> {
        self()
    }
}

/// Never sends a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn current_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn current_token(&self) -> Option<String> {
        non_blank(&self.0)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

/// Token stored in a file, re-read on every call.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for TokenFile {
    fn current_token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => non_blank(&contents),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "token file unreadable");
                None
            }
        }
    }
}

/// Token held in an environment variable, read on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        EnvToken { var: var.into() }
    }
}

impl CredentialProvider for EnvToken {
    fn current_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().and_then(|v| non_blank(&v))
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
