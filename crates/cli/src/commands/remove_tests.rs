// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use rinse_core::Method;

#[test]
fn test_remove_keeps_others() {
    let ctx = TestContext::new();
    let first = ctx.enqueue(Method::Post, "/orders");
    let second = ctx.enqueue(Method::Post, "/orders");

    run_impl(&ctx.queue, &first).unwrap();

    assert!(ctx.queue.get(&first).is_none());
    assert!(ctx.queue.get(&second).is_some());
}

#[test]
fn test_remove_unknown_id() {
    let ctx = TestContext::new();
    let err = run_impl(&ctx.queue, "1700000000000-missing00").unwrap_err();
    assert!(matches!(err, Error::ActionNotFound(id) if id == "1700000000000-missing00"));
}

#[test]
fn test_run_removes_from_disk() {
    let ctx = TestContext::new();
    let id = ctx.enqueue_on_disk(Method::Delete, "/orders/4");

    run(&ctx.context, &id).unwrap();

    assert_eq!(ctx.context.open_queue().unwrap().count(), 0);
}
