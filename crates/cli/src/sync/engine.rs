// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine for draining the offline queue against the backend.
//!
//! Provides a high-level interface for:
//! - Replaying pending actions strictly in order
//! - Tracking retries and marking actions failed at the cap
//! - Publishing online/syncing/queue state to subscribers

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rinse_core::{
    ActionQueue, ActionRequest, ActionStatus, NotificationBus, QueueSummary, QueuedAction,
    Subscription,
};
use serde::Serialize;

use super::credentials::CredentialProvider;
use super::transport::{HttpTransport, ReplayRequest, Transport};

/// Content type sent with every replayed action unless overridden.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Snapshot published to engine subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncState {
    pub is_online: bool,
    pub is_syncing: bool,
    pub queue_count: usize,
    pub pending_count: usize,
    pub failed_count: usize,
}

/// Why a call to [`SyncEngine::process_queue`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Another pass was already running.
    AlreadySyncing,
    /// The engine believes the device is offline.
    Offline,
    /// The cross-process pass lock could not be taken.
    Locked,
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncReport {
    /// Actions sent to the transport.
    pub attempted: usize,
    /// Actions acknowledged with a 2xx and removed.
    pub succeeded: usize,
    /// Actions that failed and remain pending.
    pub retried: usize,
    /// Actions that reached the retry cap during this pass.
    pub failed: usize,
    pub skipped: Option<SkipReason>,
    /// True when the queue could not be saved after the pass.
    pub unsaved: bool,
}

impl SyncReport {
    fn skipped(reason: SkipReason) -> Self {
        SyncReport {
            skipped: Some(reason),
            ..SyncReport::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Exclusive hold over the queue's storage across processes.
///
/// While the engine holds it, the queue is reloaded from storage and drained;
/// other processes wait to write. Acquisition may block the thread.
pub trait PassLock: Send + Sync {
    fn acquire(&self) -> std::io::Result<Box<dyn Send>>;
}

struct SyncFlags {
    online: AtomicBool,
    syncing: AtomicBool,
}

impl SyncFlags {
    fn state(&self, summary: &QueueSummary) -> SyncState {
        SyncState {
            is_online: self.online.load(Ordering::Acquire),
            is_syncing: self.syncing.load(Ordering::Acquire),
            queue_count: summary.total,
            pending_count: summary.pending,
            failed_count: summary.failed,
        }
    }
}

/// Drains an [`ActionQueue`] through a [`Transport`].
pub struct SyncEngine<T: Transport = HttpTransport> {
    queue: Arc<ActionQueue>,
    transport: T,
    credentials: Arc<dyn CredentialProvider>,
    default_headers: BTreeMap<String, String>,
    flags: Arc<SyncFlags>,
    bus: NotificationBus<SyncState>,
    pass_lock: Option<Arc<dyn PassLock>>,
    _queue_subscription: Subscription,
}

impl SyncEngine<HttpTransport> {
    /// Create an engine replaying against `base_url` over HTTP.
    pub fn new(
        queue: Arc<ActionQueue>,
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self::with_transport(queue, HttpTransport::new(base_url), credentials)
    }
}

impl<T: Transport> SyncEngine<T> {
    /// Create an engine with a custom transport. Starts online.
    pub fn with_transport(
        queue: Arc<ActionQueue>,
        transport: T,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let flags = Arc::new(SyncFlags {
            online: AtomicBool::new(true),
            syncing: AtomicBool::new(false),
        });
        let bus = NotificationBus::new();

        let queue_subscription = {
            let flags = Arc::clone(&flags);
            let bus = bus.clone();
            queue.subscribe(move |summary| {
                bus.publish(&flags.state(summary));
            })
        };

        let mut default_headers = BTreeMap::new();
        default_headers.insert("content-type".to_string(), DEFAULT_CONTENT_TYPE.to_string());

        SyncEngine {
            queue,
            transport,
            credentials,
            default_headers,
            flags,
            bus,
            pass_lock: None,
            _queue_subscription: queue_subscription,
        }
    }

    /// Add or replace a header sent with every replayed action.
    pub fn with_default_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Take `lock` around every pass and reload the queue under it.
    pub fn with_pass_lock(mut self, lock: Arc<dyn PassLock>) -> Self {
        self.pass_lock = Some(lock);
        self
    }

    pub fn queue(&self) -> &Arc<ActionQueue> {
        &self.queue
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current state, read fresh.
    pub fn state(&self) -> SyncState {
        self.flags.state(&self.queue.summary())
    }

    pub fn is_online(&self) -> bool {
        self.flags.online.load(Ordering::Acquire)
    }

    pub fn is_syncing(&self) -> bool {
        self.flags.syncing.load(Ordering::Acquire)
    }

    /// Record connectivity. Returns true on an offline to online transition.
    pub fn set_online(&self, online: bool) -> bool {
        let was = self.flags.online.swap(online, Ordering::AcqRel);
        if was != online {
            tracing::info!(online, "connectivity changed");
            self.refresh();
        }
        !was && online
    }

    /// Publish the current state to subscribers.
    pub fn refresh(&self) {
        self.bus.publish(&self.state());
    }

    /// Be notified of every online, syncing, and queue change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SyncState) + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn enqueue(&self, request: ActionRequest) -> String {
        self.queue.enqueue(request)
    }

    pub fn queue_snapshot(&self) -> Vec<QueuedAction> {
        self.queue.snapshot()
    }

    pub fn count(&self) -> usize {
        self.queue.count()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    pub fn remove(&self, id: &str) -> bool {
        self.queue.remove(id)
    }

    pub fn clear_queue(&self) -> usize {
        self.queue.clear()
    }

    /// Return failed actions to pending, then run a pass.
    pub async fn retry_failed(&self) -> SyncReport {
        let reset = self.queue.reset_failed();
        tracing::debug!(reset, "reset failed actions");
        self.process_queue().await
    }

    /// Replay every pending action once, in insertion order.
    ///
    /// Never fails: per-action failures become retry counts, and a pass
    /// that cannot run reports why in [`SyncReport::skipped`].
    pub async fn process_queue(&self) -> SyncReport {
        if !self.is_online() {
            tracing::debug!("offline; skipping sync");
            return SyncReport::skipped(SkipReason::Offline);
        }
        if self
            .flags
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync already in progress");
            return SyncReport::skipped(SkipReason::AlreadySyncing);
        }
        let _guard = SyncingGuard { engine: self };
        self.refresh();

        let _held = match self.acquire_pass_lock().await {
            Ok(held) => held,
            Err(e) => {
                tracing::warn!(error = %e, "could not lock offline queue storage; skipping sync");
                return SyncReport::skipped(SkipReason::Locked);
            }
        };

        // A pass abandoned mid-flight leaves actions in processing
        self.queue.requeue_processing();

        let mut report = SyncReport::default();
        for action in self.queue.dequeue_all_pending() {
            if !self.queue.mark_processing(&action.id) {
                tracing::debug!(id = %action.id, "action removed before replay");
                continue;
            }
            report.attempted += 1;

            let request = self.build_request(&action);
            let failure = match self.transport.send(request).await {
                Ok(status) if (200..300).contains(&status) => None,
                Ok(status) => Some(format!("HTTP {status}")),
                Err(e) => Some(e.to_string()),
            };

            match failure {
                None => {
                    self.queue.mark_succeeded(&action.id);
                    report.succeeded += 1;
                    tracing::debug!(id = %action.id, method = %action.method, endpoint = %action.endpoint, "replayed action");
                }
                Some(reason) => match self.queue.mark_retried(&action.id) {
                    Some(ActionStatus::Failed) => {
                        report.failed += 1;
                        tracing::warn!(id = %action.id, endpoint = %action.endpoint, %reason, "action failed permanently");
                    }
                    Some(_) => {
                        report.retried += 1;
                        tracing::debug!(id = %action.id, endpoint = %action.endpoint, %reason, "action will be retried");
                    }
                    None => {}
                },
            }
        }

        report.unsaved = self.queue.is_dirty();
        if report.unsaved {
            tracing::warn!("offline queue could not be saved after sync");
        }
        if report.attempted > 0 {
            tracing::info!(
                attempted = report.attempted,
                succeeded = report.succeeded,
                retried = report.retried,
                failed = report.failed,
                "sync pass complete"
            );
        }
        report
    }

    async fn acquire_pass_lock(&self) -> std::io::Result<Option<Box<dyn Send>>> {
        let Some(lock) = self.pass_lock.clone() else {
            return Ok(None);
        };
        let held = tokio::task::spawn_blocking(move || lock.acquire())
            .await
            .map_err(std::io::Error::other)??;
        self.queue.reload();
        Ok(Some(held))
    }

    /// Merge headers: defaults, then the action's own, then the credential.
    fn build_request(&self, action: &QueuedAction) -> ReplayRequest {
        let mut headers = self.default_headers.clone();
        if let Some(extra) = &action.headers {
            for (name, value) in extra {
                headers.insert(name.to_ascii_lowercase(), value.clone());
            }
        }
        if let Some(token) = self.credentials.current_token() {
            headers.insert("authorization".to_string(), format!("Bearer {token}"));
        }

        ReplayRequest {
            method: action.method,
            endpoint: action.endpoint.clone(),
            body: action.body.clone(),
            headers,
        }
    }
}

/// Clears the syncing flag however the pass ends, including when its
/// future is dropped.
struct SyncingGuard<'a, T: Transport> {
    engine: &'a SyncEngine<T>,
}

impl<T: Transport> Drop for SyncingGuard<'_, T> {
    fn drop(&mut self) {
        self.engine.flags.syncing.store(false, Ordering::Release);
        self.engine.refresh();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
