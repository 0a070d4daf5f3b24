// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use std::sync::atomic::AtomicUsize;

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[test]
fn test_publish_reaches_every_subscriber() {
    let bus = NotificationBus::<u32>::new();
    let a = counter();
    let b = counter();

    let _sa = {
        let a = Arc::clone(&a);
        bus.subscribe(move |v| {
            a.fetch_add(*v as usize, Ordering::SeqCst);
        })
    };
    let _sb = {
        let b = Arc::clone(&b);
        bus.subscribe(move |v| {
            b.fetch_add(*v as usize, Ordering::SeqCst);
        })
    };

    assert_eq!(bus.publish(&3), 2);
    assert_eq!(a.load(Ordering::SeqCst), 3);
    assert_eq!(b.load(Ordering::SeqCst), 3);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let bus = NotificationBus::<()>::new();
    let hits = counter();

    let sub = {
        let hits = Arc::clone(&hits);
        bus.subscribe(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };
    bus.publish(&());
    sub.unsubscribe();
    bus.publish(&());

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn test_drop_unsubscribes() {
    let bus = NotificationBus::<()>::new();
    {
        let _sub = bus.subscribe(|_| {});
        assert_eq!(bus.subscriber_count(), 1);
    }
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn test_subscription_outliving_bus_is_harmless() {
    let bus = NotificationBus::<()>::new();
    let sub = bus.subscribe(|_| {});
    drop(bus);
    sub.unsubscribe();
}

#[test]
fn test_panicking_subscriber_does_not_block_others() {
    let bus = NotificationBus::<u32>::new();
    let hits = counter();

    let _bad = bus.subscribe(|_| panic!("render failed"));
    let _good = {
        let hits = Arc::clone(&hits);
        bus.subscribe(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };

    assert_eq!(bus.publish(&1), 1);
    assert_eq!(bus.publish(&2), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(bus.subscriber_count(), 2);
}

#[test]
fn test_subscriber_can_subscribe_reentrantly() {
    let bus = NotificationBus::<()>::new();
    let nested: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

    let _outer = {
        let bus = bus.clone();
        let nested = Arc::clone(&nested);
        bus.clone().subscribe(move |_| {
            let sub = bus.subscribe(|_| {});
            nested.lock().unwrap().push(sub);
        })
    };

    bus.publish(&());
    assert_eq!(bus.subscriber_count(), 2);
}
