// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs and value parsers for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that share common flags.

use clap::Args;
use rinse_core::{validate_endpoint, ActionStatus, Method};

use super::OutputFormat;

/// Output format selection.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Parse an HTTP method, case-insensitively.
pub fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|e| e.to_string())
}

/// Parse a queued action status.
pub fn parse_status(s: &str) -> Result<ActionStatus, String> {
    s.parse::<ActionStatus>().map_err(|e| e.to_string())
}

/// Parse an endpoint path under the backend root.
pub fn parse_endpoint(s: &str) -> Result<String, String> {
    validate_endpoint(s).map_err(|e| e.to_string())?;
    Ok(s.trim().to_string())
}
