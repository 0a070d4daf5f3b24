// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rinse_core::{ActionQueue, QueueSummary};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::display::format_summary;
use crate::error::Result;
use crate::lock::lock_queue;

use super::Context;

#[derive(Serialize)]
struct StatusJson<'a> {
    backend: &'a str,
    #[serde(flatten)]
    summary: QueueSummary,
    dirty: bool,
}

pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let _lock = lock_queue(&ctx.state_dir)?;
    let queue = ctx.open_queue()?;
    run_impl(&queue, &ctx.config.backend.base_url, output)
}

pub(crate) fn run_impl(queue: &ActionQueue, base_url: &str, output: OutputFormat) -> Result<()> {
    let summary = queue.summary();
    match output {
        OutputFormat::Text => {
            for line in format_summary(&summary, base_url) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json = StatusJson {
                backend: base_url,
                summary,
                dirty: queue.is_dirty(),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
