// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for replaying queued actions.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests against the backend in production
//! - Mock transports for unit testing

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use rinse_core::{validate_endpoint, Method};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No connection could be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The HTTP client gave up waiting.
    #[error("request timed out")]
    Timeout,

    /// Any other failure while sending or reading the response.
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// One fully resolved request, headers already merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<serde_json::Value>,
    pub headers: BTreeMap<String, String>,
}

/// Transport trait for request/response communication with the backend.
///
/// Resolves to the HTTP status code. A non-2xx status is not an error at
/// this layer; the caller decides what counts as success.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ReplayRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<u16>> + Send + '_>>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`.
    ///
    /// The client keeps reqwest's default (unbounded) request timeout.
    pub fn new(base_url: &str) -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and an endpoint path. Endpoints naming another
    /// host are refused so credentials never leave the backend.
    pub fn url_for(&self, endpoint: &str) -> TransportResult<String> {
        validate_endpoint(endpoint).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(format!(
            "{}/{}",
            self.base_url,
            endpoint.trim().trim_start_matches('/')
        ))
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: ReplayRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<u16>> + Send + '_>> {
        Box::pin(async move {
            let url = self.url_for(&request.endpoint)?;
            let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

            let mut builder = self.client.request(method, &url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if request.method.sends_body() {
                if let Some(body) = &request.body {
                    builder = builder.json(body);
                }
            }

            let response = builder.send().await.map_err(classify)?;
            Ok(response.status().as_u16())
        })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else if e.is_connect() {
        TransportError::ConnectionFailed(e.to_string())
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}
