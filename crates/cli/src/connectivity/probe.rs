// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness probes for the polling observer.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::sync::{TransportError, TransportResult};

/// Upper bound on a single probe; a probe is not a replay.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers "is the backend reachable right now?".
pub trait LivenessProbe: Send + Sync {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Issues a GET and treats any HTTP response as reachable.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    /// Build a probe against `url`, each check bounded by [`PROBE_TIMEOUT`].
    pub fn new(url: impl Into<String>) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(HttpProbe {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LivenessProbe for HttpProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            match self.client.get(&self.url).send().await {
                Ok(response) => {
                    tracing::trace!(status = response.status().as_u16(), "probe answered");
                    true
                }
                Err(e) => {
                    tracing::debug!(url = %self.url, error = %e, "probe failed");
                    false
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
