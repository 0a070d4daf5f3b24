// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription/notification bus.
//!
//! Observers register a callback and get every published value until their
//! [`Subscription`] is dropped or explicitly unsubscribed. A callback that
//! panics is logged and skipped; the remaining callbacks still run.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct BusInner<T> {
    next_id: AtomicU64,
    subscribers: Mutex<BTreeMap<u64, Callback<T>>>,
}

impl<T> BusInner<T> {
    fn subscribers(&self) -> MutexGuard<'_, BTreeMap<u64, Callback<T>>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fan-out of values of type `T` to registered callbacks.
pub struct NotificationBus<T> {
    inner: Arc<BusInner<T>>,
}

impl<T: 'static> NotificationBus<T> {
    pub fn new() -> Self {
        NotificationBus {
            inner: Arc::new(BusInner {
                next_id: AtomicU64::new(0),
                subscribers: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Register `callback`. It stays registered while the returned handle lives.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers().insert(id, Arc::new(callback));

        let weak: Weak<BusInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers().remove(&id);
                }
            })),
        }
    }

    /// Deliver `value` to every subscriber. Returns how many callbacks
    /// completed without panicking.
    pub fn publish(&self, value: &T) -> usize {
        // Snapshot so callbacks may subscribe or unsubscribe re-entrantly
        let callbacks: Vec<(u64, Callback<T>)> = self
            .inner
            .subscribers()
            .iter()
            .map(|(id, cb)| (*id, Arc::clone(cb)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(value))) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::warn!(subscriber = id, "subscriber panicked; skipping"),
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }
}

impl<T: 'static> Default for NotificationBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NotificationBus<T> {
    fn clone(&self) -> Self {
        NotificationBus {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Handle returned by [`NotificationBus::subscribe`].
///
/// Dropping the handle unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the callback from the bus.
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
