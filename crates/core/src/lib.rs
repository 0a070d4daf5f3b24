// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rinse-core: Offline action queue primitives.
//!
//! This crate provides the data model, durable storage, and the action
//! queue shared by the rinse sync engine and command-line front end.
//! It has no async runtime dependency; replaying actions over the network
//! lives in the `rinse` crate.

pub mod action;
pub mod bus;
pub mod clock;
pub mod error;
pub mod kv;
pub mod queue;
pub mod store;

pub use action::{validate_endpoint, ActionRequest, ActionStatus, Method, QueuedAction};
pub use bus::{NotificationBus, Subscription};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use queue::{ActionQueue, QueuePolicy, QueueSummary};
pub use store::QueueStore;
