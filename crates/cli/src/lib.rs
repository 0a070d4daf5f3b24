// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rinse - Offline action queue and sync engine for a laundry POS.
//!
//! This crate provides the replay side of the `rinse` CLI: writes made while
//! the terminal cannot reach the backend are queued by [`rinse_core`] and
//! replayed in order by the [`sync::SyncEngine`] once connectivity returns.
//!
//! # Main Components
//!
//! - [`sync`] - Engine, transport, and credential providers
//! - [`connectivity`] - Polling and event-driven online detection
//! - [`Config`] - Backend, queue, and connectivity settings
//! - [`Error`] - Error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rinse_cli::sync::{StaticToken, SyncEngine};
//!
//! let engine = SyncEngine::new(queue, "https://pos.example.com/api", Arc::new(StaticToken::new("t")));
//! engine.enqueue(ActionRequest::new(Method::Post, "/orders"));
//! let report = engine.process_queue().await;
//! ```

mod cli;
mod commands;
mod display;
mod lock;

pub mod config;
pub mod connectivity;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

use commands::sync::Pass;
use commands::Context;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Command::Completions { shell } = cli.command {
        generate(shell, &mut Cli::command(), "rinse", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::load(cli.config.as_deref(), cli.state_dir.as_deref())?;
    tracing::debug!(state_dir = %ctx.state_dir.display(), "context loaded");

    match cli.command {
        Command::Enqueue {
            method,
            endpoint,
            body,
            headers,
            output,
        } => commands::enqueue::run(
            &ctx,
            method,
            &endpoint,
            body.as_deref(),
            &headers,
            output.output,
        ),
        Command::List { status, output } => commands::list::run(&ctx, status, output.output),
        Command::Status { output } => commands::status::run(&ctx, output.output),
        Command::Sync { output } => commands::sync::run(&ctx, Pass::Pending, output.output),
        Command::RetryFailed { output } => {
            commands::sync::run(&ctx, Pass::RetryFailed, output.output)
        }
        Command::Remove { id } => commands::remove::run(&ctx, &id),
        Command::Clear => commands::clear::run(&ctx),
        Command::Watch { mode, interval } => commands::watch::run(&ctx, mode, interval),
        Command::Completions { .. } => Ok(()),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
