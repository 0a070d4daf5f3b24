// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background connectivity observation.
//!
//! The observer runs as a tokio task, keeps the engine's online flag
//! current, and triggers drains while online. Drains run
//! on their own tasks so a slow pass never delays the next event or tick;
//! the engine's single-flight guard keeps them from overlapping.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::probe::LivenessProbe;
use super::source::{ConnectivityEvent, ConnectivitySource};
use crate::sync::{SyncEngine, Transport};

/// Default polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How connectivity is learned.
pub enum ConnectivityObserver {
    /// React to pushed events; drain once on every offline to online change.
    Events(Box<dyn ConnectivitySource>),
    /// Tick on a fixed period; optionally probe, then drain if online.
    Polling {
        interval: Duration,
        probe: Option<Arc<dyn LivenessProbe>>,
    },
}

impl ConnectivityObserver {
    pub fn events(source: impl ConnectivitySource + 'static) -> Self {
        ConnectivityObserver::Events(Box::new(source))
    }

    pub fn polling(interval: Duration) -> Self {
        ConnectivityObserver::Polling {
            interval,
            probe: None,
        }
    }

    pub fn polling_with_probe(interval: Duration, probe: Arc<dyn LivenessProbe>) -> Self {
        ConnectivityObserver::Polling {
            interval,
            probe: Some(probe),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ConnectivityObserver::Events(_) => "events",
            ConnectivityObserver::Polling { probe: None, .. } => "polling",
            ConnectivityObserver::Polling { probe: Some(_), .. } => "polling+probe",
        }
    }

    /// Run on a new task until `cancel` fires.
    pub fn spawn<T: Transport + 'static>(
        self,
        engine: Arc<SyncEngine<T>>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(engine, cancel))
    }

    /// Run until `cancel` fires or an event source closes.
    pub async fn run<T: Transport + 'static>(
        self,
        engine: Arc<SyncEngine<T>>,
        cancel: CancellationToken,
    ) {
        tracing::debug!(mode = self.describe(), "connectivity observer started");
        match self {
            ConnectivityObserver::Events(source) => run_events(source, engine, cancel).await,
            ConnectivityObserver::Polling { interval, probe } => {
                run_polling(interval, probe, engine, cancel).await
            }
        }
        tracing::debug!("connectivity observer stopped");
    }
}

async fn run_events<T: Transport + 'static>(
    mut source: Box<dyn ConnectivitySource>,
    engine: Arc<SyncEngine<T>>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return,
            event = source.next_event() => event,
        };

        match event {
            Some(ConnectivityEvent::Online) => {
                if engine.set_online(true) {
                    spawn_drain(&engine);
                }
            }
            Some(ConnectivityEvent::Offline) => {
                engine.set_online(false);
            }
            None => {
                tracing::debug!("connectivity source closed");
                return;
            }
        }
    }
}

async fn run_polling<T: Transport + 'static>(
    interval: Duration,
    probe: Option<Arc<dyn LivenessProbe>>,
    engine: Arc<SyncEngine<T>>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        if let Some(probe) = &probe {
            let online = tokio::select! {
                _ = cancel.cancelled() => return,
                online = probe.check() => online,
            };
            engine.set_online(online);
        }

        engine.refresh();
        if engine.is_online() {
            spawn_drain(&engine);
        }
    }
}

fn spawn_drain<T: Transport + 'static>(engine: &Arc<SyncEngine<T>>) {
    let engine = Arc::clone(engine);
    tokio::spawn(async move {
        engine.process_queue().await;
    });
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
