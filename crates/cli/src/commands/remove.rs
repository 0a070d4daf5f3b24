// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rinse_core::ActionQueue;

use crate::error::{Error, Result};
use crate::lock::lock_queue;

use super::Context;

pub fn run(ctx: &Context, id: &str) -> Result<()> {
    let _lock = lock_queue(&ctx.state_dir)?;
    let queue = ctx.open_queue()?;
    run_impl(&queue, id)
}

pub(crate) fn run_impl(queue: &ActionQueue, id: &str) -> Result<()> {
    if !queue.remove(id) {
        return Err(Error::ActionNotFound(id.to_string()));
    }
    println!("Removed {}", id);
    Ok(())
}

#[cfg(test)]
#[path = "remove_tests.rs"]
mod tests;
