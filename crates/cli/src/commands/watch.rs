// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running drain driven by connectivity changes.
//!
//! `rinse watch` holds `watch.lock` for its lifetime and takes `queue.lock`
//! around each pass, so one-shot commands can keep writing to the queue
//! while it runs.

use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{Config, ConnectivityMode};
use crate::connectivity::{spawn_line_reader, ConnectivityObserver, HttpProbe};
use crate::error::Result;
use crate::lock::{lock_queue, try_lock_watch, QueueFileLock};
use crate::sync::{SyncEngine, Transport};

use super::Context;

/// How long shutdown waits for an in-flight pass.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub fn run(ctx: &Context, mode: Option<ConnectivityMode>, interval: Option<u64>) -> Result<()> {
    let input = std::io::BufReader::new(std::io::stdin());
    run_until(ctx, mode, interval, input, shutdown_signal())
}

/// Watch with events read from `input` until `shutdown` resolves.
///
/// Blocking work still running after the grace period (a pass waiting on
/// `queue.lock`) is abandoned rather than waited for.
pub(crate) fn run_until<R, S>(
    ctx: &Context,
    mode: Option<ConnectivityMode>,
    interval: Option<u64>,
    input: R,
    shutdown: S,
) -> Result<()>
where
    R: BufRead + Send + 'static,
    S: Future<Output = std::io::Result<()>>,
{
    let _watch_lock = try_lock_watch(&ctx.state_dir)?;
    let queue = {
        let _lock = lock_queue(&ctx.state_dir)?;
        ctx.open_queue()?
    };
    let engine = Arc::new(
        ctx.engine(queue)
            .with_pass_lock(Arc::new(QueueFileLock::new(&ctx.state_dir))),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        let observer = build_observer(&ctx.config, mode, interval, input)?;
        watch(engine, observer, shutdown).await
    });
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Pick the observer variant from config, with command-line overrides.
/// Events mode reads from `input`.
pub(crate) fn build_observer<R>(
    config: &Config,
    mode: Option<ConnectivityMode>,
    interval: Option<u64>,
    input: R,
) -> Result<ConnectivityObserver>
where
    R: BufRead + Send + 'static,
{
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.poll_interval());
    let observer = match mode.unwrap_or(config.connectivity.mode) {
        ConnectivityMode::Polling => match config.probe_url() {
            Some(url) => {
                ConnectivityObserver::polling_with_probe(interval, Arc::new(HttpProbe::new(url)?))
            }
            None => ConnectivityObserver::polling(interval),
        },
        ConnectivityMode::Events => ConnectivityObserver::events(spawn_line_reader(input, 16)?),
    };
    Ok(observer)
}

async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Run `observer` until `shutdown` resolves or its event source closes.
pub(crate) async fn watch<T, S>(
    engine: Arc<SyncEngine<T>>,
    observer: ConnectivityObserver,
    shutdown: S,
) -> Result<()>
where
    T: Transport + 'static,
    S: Future<Output = std::io::Result<()>>,
{
    let _state_log = engine.subscribe(|state| tracing::debug!(?state, "sync state"));
    tracing::info!(
        mode = observer.describe(),
        pending = engine.pending_count(),
        "watching connectivity"
    );

    let initial_pass = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.process_queue().await })
    };

    let cancel = CancellationToken::new();
    let mut observer_task = observer.spawn(Arc::clone(&engine), cancel.clone());

    let observer_done = tokio::select! {
        result = shutdown => {
            result?;
            tracing::info!("interrupted; stopping");
            false
        }
        _ = &mut observer_task => {
            tracing::info!("connectivity source closed; stopping");
            true
        }
    };

    cancel.cancel();
    if !observer_done {
        if let Err(e) = observer_task.await {
            tracing::warn!(error = %e, "connectivity observer ended abnormally");
        }
    }

    let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
    if let Ok(Ok(report)) = tokio::time::timeout_at(deadline, initial_pass).await {
        tracing::debug!(?report, "initial pass finished");
    }
    while engine.is_syncing() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    if engine.is_syncing() {
        tracing::warn!("stopping during a sync pass; unfinished actions replay on next start");
    }
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
