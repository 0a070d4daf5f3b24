// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline action queue.
//!
//! [`ActionQueue`] owns every [`QueuedAction`]. All mutations run inside one
//! critical section that also writes the full list through the
//! [`QueueStore`], so a mutation is durable before the lock is released.
//! Subscribers are notified after the lock is released, with a
//! [`QueueSummary`] whose `revision` orders notifications.
//!
//! A failed save does not roll back the mutation: the in-memory list stays
//! authoritative, the queue is marked dirty, and the next mutation (or an
//! explicit [`flush`](ActionQueue::flush)) writes the whole list again.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::action::{generate_unique_id, ActionRequest, ActionStatus, QueuedAction};
use crate::bus::{NotificationBus, Subscription};
use crate::clock::{ClockSource, SystemClock};
use crate::error::Result;
use crate::store::QueueStore;

/// Default capacity of the queue.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

/// Default number of failed replays before an action is marked failed.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Capacity and retry limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePolicy {
    /// Maximum number of actions held. Enqueueing beyond it evicts the oldest.
    pub max_size: usize,
    /// Failed replays after which an action becomes `failed`.
    pub max_retries: u32,
}

impl QueuePolicy {
    /// Limits are clamped to at least one.
    pub fn new(max_size: usize, max_retries: u32) -> Self {
        QueuePolicy {
            max_size: max_size.max(1),
            max_retries: max_retries.max(1),
        }
    }
}

impl Default for QueuePolicy {
    fn default() -> Self {
        QueuePolicy::new(DEFAULT_MAX_QUEUE_SIZE, DEFAULT_MAX_RETRIES)
    }
}

/// Counts published after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QueueSummary {
    /// Increments on every mutation of this queue instance.
    pub revision: u64,
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub failed: usize,
}

struct QueueState {
    actions: Vec<QueuedAction>,
    revision: u64,
    dirty: bool,
}

impl QueueState {
    fn summary(&self) -> QueueSummary {
        let mut summary = QueueSummary {
            revision: self.revision,
            total: self.actions.len(),
            ..QueueSummary::default()
        };
        for action in &self.actions {
            match action.status {
                ActionStatus::Pending => summary.pending += 1,
                ActionStatus::Processing => summary.processing += 1,
                ActionStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}

/// Durable FIFO of deferred network writes.
pub struct ActionQueue {
    state: Mutex<QueueState>,
    store: QueueStore,
    policy: QueuePolicy,
    clock: Arc<dyn ClockSource>,
    bus: NotificationBus<QueueSummary>,
}

impl ActionQueue {
    /// Rebuild the queue from `store` using the system clock.
    pub fn open(store: QueueStore, policy: QueuePolicy) -> Self {
        Self::with_clock(store, policy, Arc::new(SystemClock))
    }

    /// Rebuild the queue from `store` with an injected clock.
    ///
    /// Loading repairs what a crash can leave behind: actions stuck in
    /// `processing` go back to `pending`, duplicate IDs keep their first
    /// record, and the list is trimmed to capacity oldest-first.
    pub fn with_clock(store: QueueStore, policy: QueuePolicy, clock: Arc<dyn ClockSource>) -> Self {
        let loaded = store.load();
        let loaded_len = loaded.len();
        let (actions, repaired) = repair(loaded, policy);

        let queue = ActionQueue {
            state: Mutex::new(QueueState {
                actions,
                revision: 0,
                dirty: false,
            }),
            store,
            policy,
            clock,
            bus: NotificationBus::new(),
        };

        if repaired {
            let mut state = queue.lock();
            queue.persist(&mut state, "open");
        }
        tracing::debug!(loaded = loaded_len, kept = queue.count(), "offline queue opened");
        queue
    }

    /// Replace the in-memory list with what storage currently holds.
    ///
    /// Used when another process may have written the same storage key.
    /// Unsaved local changes win: if the queue is dirty and cannot be
    /// flushed, storage is not read. Returns true if the list changed.
    pub fn reload(&self) -> bool {
        if self.is_dirty() {
            if let Err(e) = self.flush() {
                tracing::warn!(error = %e, "offline queue has unsaved changes; skipping reload");
                return false;
            }
        }

        let (loaded, _) = repair(self.store.load(), self.policy);
        self.mutate("reload", |actions| {
            if *actions == loaded {
                (false, false)
            } else {
                *actions = loaded;
                (true, true)
            }
        })
    }

    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Add a new pending action and return its ID.
    ///
    /// At capacity the oldest action is evicted first. Never touches the
    /// network.
    pub fn enqueue(&self, request: ActionRequest) -> String {
        let now = self.clock.now_ms();
        let max_size = self.policy.max_size;

        self.mutate("enqueue", |actions| {
            while actions.len() >= max_size {
                match evict_oldest(actions) {
                    Some(evicted) => tracing::warn!(
                        id = %evicted.id,
                        endpoint = %evicted.endpoint,
                        "offline queue full; evicted oldest action"
                    ),
                    None => break,
                }
            }

            let id = generate_unique_id(now, |candidate| actions.iter().any(|a| a.id == candidate));
            tracing::debug!(id = %id, method = %request.method, endpoint = %request.endpoint, "queued action");
            actions.push(QueuedAction::new(id.clone(), request, now));
            (id, true)
        })
    }

    /// Snapshot of pending actions in insertion order.
    pub fn dequeue_all_pending(&self) -> Vec<QueuedAction> {
        self.lock()
            .actions
            .iter()
            .filter(|a| a.is_pending())
            .cloned()
            .collect()
    }

    /// Mark an action as being replayed. Returns false if it no longer exists.
    pub fn mark_processing(&self, id: &str) -> bool {
        self.mutate("mark_processing", |actions| {
            match actions.iter_mut().find(|a| a.id == id) {
                Some(action) => {
                    action.status = ActionStatus::Processing;
                    (true, true)
                }
                None => (false, false),
            }
        })
    }

    /// Remove a successfully replayed action. Returns false if it no longer exists.
    pub fn mark_succeeded(&self, id: &str) -> bool {
        self.mutate("mark_succeeded", |actions| remove_by_id(actions, id))
    }

    /// Record a failed replay.
    ///
    /// Returns the resulting status (`failed` once the retry cap is reached,
    /// otherwise `pending`), or `None` if the action no longer exists.
    pub fn mark_retried(&self, id: &str) -> Option<ActionStatus> {
        let max_retries = self.policy.max_retries;
        self.mutate("mark_retried", |actions| {
            match actions.iter_mut().find(|a| a.id == id) {
                Some(action) => {
                    action.retries = action.retries.saturating_add(1);
                    action.status = settled_status(action.retries, max_retries);
                    (Some(action.status), true)
                }
                None => (None, false),
            }
        })
    }

    /// Remove one action regardless of its status.
    pub fn remove(&self, id: &str) -> bool {
        self.mutate("remove", |actions| remove_by_id(actions, id))
    }

    /// Drop every action. Returns how many were removed.
    pub fn clear(&self) -> usize {
        self.mutate("clear", |actions| {
            let removed = actions.len();
            actions.clear();
            (removed, true)
        })
    }

    /// Return every failed action to `pending` with a zero retry count.
    pub fn reset_failed(&self) -> usize {
        self.mutate("reset_failed", |actions| {
            let mut reset = 0;
            for action in actions.iter_mut().filter(|a| a.is_failed()) {
                action.status = ActionStatus::Pending;
                action.retries = 0;
                reset += 1;
            }
            (reset, reset > 0)
        })
    }

    /// Return actions left in `processing` to `pending`.
    ///
    /// Only safe when no replay is in flight; the sync engine calls this at
    /// the start of a pass to recover from an abandoned one.
    pub fn requeue_processing(&self) -> usize {
        let max_retries = self.policy.max_retries;
        self.mutate("requeue_processing", |actions| {
            let mut requeued = 0;
            for action in actions
                .iter_mut()
                .filter(|a| a.status == ActionStatus::Processing)
            {
                action.status = settled_status(action.retries, max_retries);
                requeued += 1;
            }
            (requeued, requeued > 0)
        })
    }

    /// Snapshot of every action in insertion order.
    pub fn snapshot(&self) -> Vec<QueuedAction> {
        self.lock().actions.clone()
    }

    pub fn get(&self, id: &str) -> Option<QueuedAction> {
        self.lock().actions.iter().find(|a| a.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.lock().actions.len()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().actions.iter().filter(|a| a.is_pending()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.lock().actions.iter().filter(|a| a.is_failed()).count()
    }

    pub fn summary(&self) -> QueueSummary {
        self.lock().summary()
    }

    /// True when the last save failed and memory is ahead of storage.
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    /// Write the full list to storage again.
    pub fn flush(&self) -> Result<()> {
        let mut state = self.lock();
        self.store.save(&state.actions)?;
        state.dirty = false;
        Ok(())
    }

    /// Be notified with a [`QueueSummary`] after every mutation.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&QueueSummary) + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` in the critical section. When it reports a change, persist
    /// before unlocking and notify after.
    fn mutate<R>(&self, op: &'static str, f: impl FnOnce(&mut Vec<QueuedAction>) -> (R, bool)) -> R {
        let (result, summary) = {
            let mut state = self.lock();
            let (result, changed) = f(&mut state.actions);
            if !changed {
                return result;
            }
            state.revision += 1;
            self.persist(&mut state, op);
            (result, state.summary())
        };

        self.bus.publish(&summary);
        result
    }

    fn persist(&self, state: &mut QueueState, op: &'static str) {
        match self.store.save(&state.actions) {
            Ok(()) => state.dirty = false,
            Err(e) => {
                state.dirty = true;
                tracing::warn!(op, error = %e, "failed to persist offline queue; keeping changes in memory");
            }
        }
    }
}

/// Repair what a crash or a foreign writer can leave behind.
fn repair(mut actions: Vec<QueuedAction>, policy: QueuePolicy) -> (Vec<QueuedAction>, bool) {
    let loaded = actions.len();

    let mut seen = HashSet::new();
    actions.retain(|a| seen.insert(a.id.clone()));
    let mut repaired = loaded != actions.len();

    for action in actions.iter_mut() {
        let status = settled_status(action.retries, policy.max_retries);
        if action.status != status && action.status != ActionStatus::Failed {
            action.status = status;
            repaired = true;
        }
    }

    while actions.len() > policy.max_size {
        match evict_oldest(&mut actions) {
            Some(evicted) => {
                tracing::warn!(id = %evicted.id, "offline queue over capacity on load; evicted oldest action");
                repaired = true;
            }
            None => break,
        }
    }

    (actions, repaired)
}

fn settled_status(retries: u32, max_retries: u32) -> ActionStatus {
    if retries >= max_retries {
        ActionStatus::Failed
    } else {
        ActionStatus::Pending
    }
}

/// Remove the action with the lowest timestamp (first inserted on ties).
fn evict_oldest(actions: &mut Vec<QueuedAction>) -> Option<QueuedAction> {
    let index = actions
        .iter()
        .enumerate()
        .min_by_key(|(_, a)| a.timestamp)
        .map(|(i, _)| i)?;
    Some(actions.remove(index))
}

fn remove_by_id(actions: &mut Vec<QueuedAction>, id: &str) -> (bool, bool) {
    match actions.iter().position(|a| a.id == id) {
        Some(index) => {
            actions.remove(index);
            (true, true)
        }
        None => (false, false),
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
