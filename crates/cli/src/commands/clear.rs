// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rinse_core::ActionQueue;

use crate::error::Result;
use crate::lock::lock_queue;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let _lock = lock_queue(&ctx.state_dir)?;
    let queue = ctx.open_queue()?;
    run_impl(&queue)
}

pub(crate) fn run_impl(queue: &ActionQueue) -> Result<()> {
    let removed = queue.clear();
    if queue.is_dirty() {
        queue.flush()?;
    }
    println!("Cleared {} action(s)", removed);
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
