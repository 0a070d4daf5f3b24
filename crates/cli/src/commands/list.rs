// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rinse_core::{ActionQueue, ActionStatus, QueuedAction};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::display::format_action_line;
use crate::error::Result;
use crate::lock::lock_queue;

use super::Context;

/// JSON output structure for the list command.
#[derive(Serialize)]
struct ListOutputJson<'a> {
    actions: &'a [QueuedAction],
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ActionStatus>,
}

pub fn run(ctx: &Context, status: Option<ActionStatus>, output: OutputFormat) -> Result<()> {
    let _lock = lock_queue(&ctx.state_dir)?;
    let queue = ctx.open_queue()?;
    run_impl(&queue, status, output)
}

pub(crate) fn run_impl(
    queue: &ActionQueue,
    status: Option<ActionStatus>,
    output: OutputFormat,
) -> Result<()> {
    let actions = filter_actions(queue.snapshot(), status);
    match output {
        OutputFormat::Text => {
            if actions.is_empty() {
                println!("Queue is empty");
            }
            for action in &actions {
                println!("{}", format_action_line(action));
            }
        }
        OutputFormat::Json => {
            let output = ListOutputJson {
                actions: &actions,
                status,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Keep queue order; drop actions not in `status`.
pub(crate) fn filter_actions(
    actions: Vec<QueuedAction>,
    status: Option<ActionStatus>,
) -> Vec<QueuedAction> {
    match status {
        Some(status) => actions.into_iter().filter(|a| a.status == status).collect(),
        None => actions,
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
