// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::connectivity::source::ChannelSource;
use crate::sync::test_helpers::make_engine;
use rinse_core::{ActionRequest, Method};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

/// Probe whose answer the test flips.
struct SwitchProbe(AtomicBool);

impl LivenessProbe for SwitchProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let online = self.0.load(Ordering::SeqCst);
        Box::pin(async move { online })
    }
}

async fn wait_until(mut done: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn post(endpoint: &str) -> ActionRequest {
    ActionRequest::new(Method::Post, endpoint)
}

#[tokio::test]
async fn test_events_drain_on_transition_to_online() {
    let (engine, mock) = make_engine();
    let engine = Arc::new(engine);
    let (tx, source) = ChannelSource::new(8);
    let cancel = CancellationToken::new();
    let handle = ConnectivityObserver::events(source).spawn(Arc::clone(&engine), cancel.clone());

    tx.send(ConnectivityEvent::Offline).await.unwrap();
    wait_until(|| !engine.is_online()).await;

    engine.enqueue(post("/orders"));
    assert!(mock.sent().is_empty());

    tx.send(ConnectivityEvent::Online).await.unwrap();
    wait_until(|| engine.count() == 0).await;
    assert_eq!(mock.sent_endpoints(), vec!["/orders"]);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_events_online_while_online_does_not_drain() {
    let (engine, mock) = make_engine();
    let engine = Arc::new(engine);
    let (tx, source) = ChannelSource::new(8);
    engine.enqueue(post("/orders"));

    tx.send(ConnectivityEvent::Online).await.unwrap();
    drop(tx);

    // Source closes after the one event, so run returns
    ConnectivityObserver::events(source)
        .run(Arc::clone(&engine), CancellationToken::new())
        .await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(mock.sent().is_empty());
    assert_eq!(engine.count(), 1);
}

#[tokio::test]
async fn test_polling_drains_each_tick_while_online() {
    let (engine, mock) = make_engine();
    let engine = Arc::new(engine);
    let cancel = CancellationToken::new();
    let handle = ConnectivityObserver::polling(Duration::from_millis(5))
        .spawn(Arc::clone(&engine), cancel.clone());

    engine.enqueue(post("/a"));
    wait_until(|| mock.sent().len() == 1).await;
    engine.enqueue(post("/b"));
    wait_until(|| mock.sent().len() == 2).await;

    cancel.cancel();
    handle.await.unwrap();
    wait_until(|| engine.count() == 0).await;
}

#[tokio::test]
async fn test_polling_probe_controls_online_flag() {
    let (engine, mock) = make_engine();
    let engine = Arc::new(engine);
    let probe = Arc::new(SwitchProbe(AtomicBool::new(false)));
    let cancel = CancellationToken::new();
    engine.enqueue(post("/orders"));

    let handle = ConnectivityObserver::polling_with_probe(Duration::from_millis(5), probe.clone())
        .spawn(Arc::clone(&engine), cancel.clone());

    wait_until(|| !engine.is_online()).await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(mock.sent().is_empty());

    probe.0.store(true, Ordering::SeqCst);
    wait_until(|| engine.count() == 0).await;
    assert!(engine.is_online());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_polling_and_events_share_single_flight() {
    let (engine, mock) = make_engine();
    let engine = Arc::new(engine);
    let gate = mock.gate();
    let (tx, source) = ChannelSource::new(8);
    let cancel = CancellationToken::new();
    engine.set_online(false);
    engine.enqueue(post("/orders"));

    let events = ConnectivityObserver::events(source).spawn(Arc::clone(&engine), cancel.clone());
    let polling = ConnectivityObserver::polling(Duration::from_millis(2))
        .spawn(Arc::clone(&engine), cancel.clone());

    tx.send(ConnectivityEvent::Online).await.unwrap();
    wait_until(|| engine.is_syncing()).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Many ticks elapsed while the pass was blocked; only one request went out
    assert_eq!(mock.sent().len(), 1);

    gate.add_permits(1);
    wait_until(|| engine.count() == 0).await;

    cancel.cancel();
    events.await.unwrap();
    polling.await.unwrap();
}

#[test]
fn test_describe_names_mode() {
    let (_tx, source) = ChannelSource::new(1);
    assert_eq!(ConnectivityObserver::events(source).describe(), "events");
    assert_eq!(
        ConnectivityObserver::polling(DEFAULT_POLL_INTERVAL).describe(),
        "polling"
    );
    let probe: Arc<dyn LivenessProbe> = Arc::new(SwitchProbe(AtomicBool::new(true)));
    assert_eq!(
        ConnectivityObserver::polling_with_probe(DEFAULT_POLL_INTERVAL, probe).describe(),
        "polling+probe"
    );
}
