// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

use std::sync::Arc;

use rinse_core::{ActionQueue, MemoryKvStore, QueuePolicy, QueueStore};

use super::credentials::{CredentialProvider, NoCredentials};
use super::engine::SyncEngine;
use super::transport_tests::MockTransport;

/// In-memory queue with the default policy.
pub fn make_queue() -> (Arc<MemoryKvStore>, Arc<ActionQueue>) {
    make_queue_with_policy(QueuePolicy::default())
}

pub fn make_queue_with_policy(policy: QueuePolicy) -> (Arc<MemoryKvStore>, Arc<ActionQueue>) {
    let kv = Arc::new(MemoryKvStore::new());
    let queue = Arc::new(ActionQueue::open(QueueStore::new(kv.clone()), policy));
    (kv, queue)
}

/// Engine over a fresh queue and a mock transport answering 200.
pub fn make_engine() -> (SyncEngine<MockTransport>, MockTransport) {
    make_engine_with_credentials(Arc::new(NoCredentials))
}

pub fn make_engine_with_credentials(
    credentials: Arc<dyn CredentialProvider>,
) -> (SyncEngine<MockTransport>, MockTransport) {
    let (_, queue) = make_queue();
    let mock = MockTransport::new();
    let engine = SyncEngine::with_transport(queue, mock.clone(), credentials);
    (engine, mock)
}
