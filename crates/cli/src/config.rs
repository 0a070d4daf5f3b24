// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal configuration.
//!
//! Configuration is read from `config.toml` and includes:
//! - `[backend]`: where queued actions are replayed, and how to authenticate
//! - `[queue]`: capacity, retry cap, and storage key
//! - `[connectivity]`: how `rinse watch` learns about the network
//!
//! Every field has a default, so a missing file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rinse_core::queue::{DEFAULT_MAX_QUEUE_SIZE, DEFAULT_MAX_RETRIES};
use rinse_core::store::DEFAULT_STORAGE_KEY;
use rinse_core::QueuePolicy;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::{CredentialProvider, EnvToken, StaticToken, TokenFile};

const APP_DIR_NAME: &str = "rinse";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default backend root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend: BackendConfig,
    pub queue: QueueConfig,
    pub connectivity: ConnectivityConfig,
}

/// Backend replay target and credentials.
///
/// Token sources are tried in order: `token_file`, `token_env`, `token`,
/// then the `RINSE_TOKEN` environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    /// Extra headers sent with every replayed action.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            token_file: None,
            token_env: None,
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    pub max_size: usize,
    pub max_retries: u32,
    pub storage_key: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            max_size: DEFAULT_MAX_QUEUE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// How `rinse watch` observes connectivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityMode {
    #[default]
    Polling,
    /// Read `online` / `offline` lines from stdin.
    Events,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectivityConfig {
    pub mode: ConnectivityMode,
    pub poll_interval_secs: u64,
    /// Path under `base_url` probed each tick; unset means assume online.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_path: Option<String>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            mode: ConnectivityMode::Polling,
            poll_interval_secs: 5,
            probe_path: None,
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "invalid base_url '{}': must start with http:// or https://",
                url
            )));
        }
        if self.queue.max_size == 0 {
            return Err(Error::Config("queue.max_size must be at least 1".to_string()));
        }
        if self.queue.max_retries == 0 {
            return Err(Error::Config(
                "queue.max_retries must be at least 1".to_string(),
            ));
        }
        if self.queue.storage_key.trim().is_empty() {
            return Err(Error::Config("queue.storage_key cannot be empty".to_string()));
        }
        if self.connectivity.poll_interval_secs == 0 {
            return Err(Error::Config(
                "connectivity.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> QueuePolicy {
        QueuePolicy::new(self.queue.max_size, self.queue.max_retries)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.connectivity.poll_interval_secs)
    }

    /// Full probe URL, if a probe path is configured.
    pub fn probe_url(&self) -> Option<String> {
        self.connectivity.probe_path.as_ref().map(|path| {
            format!(
                "{}/{}",
                self.backend.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }

    /// Build the credential provider the backend section describes.
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        let backend = &self.backend;
        if let Some(path) = &backend.token_file {
            Arc::new(TokenFile::new(path))
        } else if let Some(var) = &backend.token_env {
            Arc::new(EnvToken::new(var))
        } else if let Some(token) = &backend.token {
            Arc::new(StaticToken::new(token))
        } else {
            Arc::new(EnvToken::new(env::vars::RINSE_TOKEN))
        }
    }
}

/// Resolve the config file path.
///
/// Order: explicit flag, `RINSE_CONFIG`, `$XDG_CONFIG_HOME/rinse/config.toml`,
/// then the platform config directory.
pub fn resolve_config_path(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env::config_path() {
        return Some(path);
    }
    env::xdg_config_home()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Resolve the state directory holding the queue database.
///
/// Order: explicit flag, `RINSE_STATE_DIR`, `$XDG_STATE_HOME/rinse`,
/// then `~/.local/state/rinse`.
pub fn resolve_state_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::state_dir() {
        return Ok(path);
    }
    if let Some(base) = env::xdg_state_home() {
        return Ok(base.join(APP_DIR_NAME));
    }
    dirs::home_dir()
        .map(|home| home.join(".local").join("state").join(APP_DIR_NAME))
        .ok_or_else(|| {
            Error::Config(
                "cannot determine state directory\n  hint: set RINSE_STATE_DIR or pass --state-dir"
                    .to_string(),
            )
        })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
