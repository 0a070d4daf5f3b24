// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::OutputFormat;
use crate::display::format_report;
use crate::error::Result;
use crate::lock::lock_queue;
use crate::sync::{SyncEngine, SyncReport, Transport};

use super::Context;

/// Which pass a one-shot invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Pending,
    RetryFailed,
}

pub fn run(ctx: &Context, pass: Pass, output: OutputFormat) -> Result<()> {
    let _lock = lock_queue(&ctx.state_dir)?;
    let engine = ctx.engine(ctx.open_queue()?);
    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(run_pass(&engine, pass));
    print_report(&report, output)
}

pub(crate) async fn run_pass<T: Transport>(engine: &SyncEngine<T>, pass: Pass) -> SyncReport {
    match pass {
        Pass::Pending => engine.process_queue().await,
        Pass::RetryFailed => engine.retry_failed().await,
    }
}

fn print_report(report: &SyncReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("{}", format_report(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
