// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued network actions.
//!
//! A [`QueuedAction`] is one deferred write against the backend: the request
//! to replay plus the bookkeeping the sync engine updates between attempts.
//! Records are created by [`ActionQueue::enqueue`](crate::ActionQueue::enqueue)
//! from an [`ActionRequest`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of the random part of an action ID.
const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// HTTP method of a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the wire representation of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Returns true if requests with this method carry a body on replay.
    pub fn sends_body(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// Replay status of a queued action.
///
/// There is no succeeded state: a replayed action is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Waiting for the next sync pass.
    Pending,
    /// Being replayed right now.
    Processing,
    /// Retry cap reached. Stays here until explicitly reset.
    Failed,
}

impl ActionStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "pending",
            ActionStatus::Processing => "processing",
            ActionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ActionStatus::Pending),
            "processing" => Ok(ActionStatus::Processing),
            "failed" => Ok(ActionStatus::Failed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A network write to defer, before it is given an ID and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl ActionRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        ActionRequest {
            endpoint: endpoint.into(),
            method,
            body: None,
            headers: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// One durable record of a deferred network write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub id: String,
    pub endpoint: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Creation time in milliseconds since Unix epoch.
    pub timestamp: u64,
    #[serde(default)]
    pub retries: u32,
    pub status: ActionStatus,
}

impl QueuedAction {
    /// Creates a fresh pending record for `request`.
    pub fn new(id: String, request: ActionRequest, timestamp: u64) -> Self {
        QueuedAction {
            id,
            endpoint: request.endpoint,
            method: request.method,
            body: request.body,
            headers: request.headers,
            timestamp,
            retries: 0,
            status: ActionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ActionStatus::Pending
    }

    pub fn is_failed(&self) -> bool {
        self.status == ActionStatus::Failed
    }

    /// Creation time as a UTC datetime, for display.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Check that `endpoint` is a path under the backend root.
///
/// Absolute URLs (anything starting with a `scheme:`) are rejected, as are
/// scheme-relative `//host` paths; credentials are only ever sent to the
/// configured backend.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("endpoint cannot be empty".to_string()));
    }
    if has_scheme(trimmed) || trimmed.starts_with("//") {
        return Err(Error::InvalidInput(format!(
            "endpoint '{}' must be a path relative to the backend URL\n  hint: use e.g. /orders/123",
            trimmed
        )));
    }
    Ok(())
}

fn has_scheme(s: &str) -> bool {
    let head = s.split(['/', '?', '#']).next().unwrap_or_default();
    match head.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Generate an action ID.
/// Format: {timestamp_ms}-{suffix} where suffix is 9 random base-36 characters.
pub fn generate_id(now_ms: u64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", now_ms, suffix)
}

/// Generate an action ID that `exists` does not already report as taken.
pub fn generate_unique_id<F>(now_ms: u64, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_id(now_ms);
        if !exists(&id) {
            return id;
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
