// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use reqwest::header::{HeaderName, HeaderValue};
use rinse_core::{validate_endpoint, ActionQueue, ActionRequest, Method};

use crate::cli::OutputFormat;
use crate::display::format_action_line;
use crate::error::{Error, Result};
use crate::lock::lock_queue;

use super::Context;

pub fn run(
    ctx: &Context,
    method: Method,
    endpoint: &str,
    body: Option<&str>,
    headers: &[String],
    output: OutputFormat,
) -> Result<()> {
    let request = build_request(method, endpoint, body, headers)?;
    let _lock = lock_queue(&ctx.state_dir)?;
    let queue = ctx.open_queue()?;
    run_impl(&queue, request, output)
}

pub(crate) fn run_impl(
    queue: &ActionQueue,
    request: ActionRequest,
    output: OutputFormat,
) -> Result<()> {
    if request.body.is_some() && !request.method.sends_body() {
        eprintln!(
            "warning: {} requests are replayed without a body",
            request.method
        );
    }

    let id = queue.enqueue(request);
    if queue.is_dirty() {
        eprintln!("warning: queued in memory only; the queue database could not be written");
    }

    let Some(action) = queue.get(&id) else {
        return Err(Error::ActionNotFound(id));
    };
    match output {
        OutputFormat::Text => println!("Queued {}", format_action_line(&action)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&action)?),
    }
    Ok(())
}

/// Validate command-line input into a request.
pub(crate) fn build_request(
    method: Method,
    endpoint: &str,
    body: Option<&str>,
    headers: &[String],
) -> Result<ActionRequest> {
    validate_endpoint(endpoint)?;
    let mut request = ActionRequest::new(method, endpoint.trim());
    if let Some(raw) = body {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| Error::InvalidBody(e.to_string()))?;
        request = request.with_body(value);
    }
    for raw in headers {
        let (name, value) = parse_header(raw)?;
        request = request.with_header(name, value);
    }
    Ok(request)
}

/// Split `NAME:VALUE`, trimming both halves. The value may be empty.
///
/// Both halves must be valid HTTP header text, otherwise the action
/// could never be replayed.
pub(crate) fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::InvalidHeader(raw.to_string()))?;
    let (name, value) = (name.trim(), value.trim());
    if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err() {
        return Err(Error::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
