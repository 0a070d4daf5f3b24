// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use yare::parameterized;

#[parameterized(
    simple = { "X-Store-Id:4", "X-Store-Id", "4" },
    spaced = { " X-Store-Id :  4 ", "X-Store-Id", "4" },
    colon_in_value = { "X-Since:12:30", "X-Since", "12:30" },
    empty_value = { "X-Empty:", "X-Empty", "" },
)]
fn test_parse_header(raw: &str, name: &str, value: &str) {
    assert_eq!(
        parse_header(raw).unwrap(),
        (name.to_string(), value.to_string())
    );
}

#[parameterized(
    no_colon = { "X-Store-Id" },
    empty_name = { ":4" },
    space_in_name = { "X Store:4" },
    parens_in_name = { "X(Store):4" },
    non_ascii_name = { "X-Störe:4" },
    control_in_value = { "X-Store-Id:4\u{1}2" },
    delete_in_value = { "X-Store-Id:4\u{7f}" },
)]
fn test_parse_header_rejects(raw: &str) {
    assert!(matches!(parse_header(raw), Err(Error::InvalidHeader(_))));
}

#[test]
fn test_build_request_parses_body_and_headers() {
    let request = build_request(
        Method::Put,
        "/orders/1",
        Some(r#"{"status":"ready"}"#),
        &["X-A:1".to_string()],
    )
    .unwrap();

    assert_eq!(request.body, Some(serde_json::json!({"status": "ready"})));
    assert_eq!(request.headers.unwrap()["X-A"], "1");
}

#[parameterized(
    absolute = { "http://other.local/orders" },
    scheme_relative = { "//other.local/orders" },
    blank = { "   " },
)]
fn test_build_request_rejects_endpoint(endpoint: &str) {
    let err = build_request(Method::Post, endpoint, None, &[]).unwrap_err();
    assert!(matches!(err, Error::Core(rinse_core::Error::InvalidInput(_))));
}

#[test]
fn test_build_request_rejects_bad_json() {
    let err = build_request(Method::Post, "/orders", Some("{status"), &[]).unwrap_err();
    assert!(matches!(err, Error::InvalidBody(_)));
}

#[test]
fn test_run_impl_appends_pending_action() {
    let ctx = TestContext::new();
    let request = ActionRequest::new(Method::Post, "/orders");

    run_impl(&ctx.queue, request, OutputFormat::Text).unwrap();
    run_impl(
        &ctx.queue,
        ActionRequest::new(Method::Delete, "/orders/1"),
        OutputFormat::Json,
    )
    .unwrap();

    let endpoints: Vec<_> = ctx
        .queue
        .snapshot()
        .into_iter()
        .map(|a| a.endpoint)
        .collect();
    assert_eq!(endpoints, vec!["/orders", "/orders/1"]);
    assert_eq!(ctx.queue.pending_count(), 2);
}

#[test]
fn test_run_persists_to_state_dir() {
    let ctx = TestContext::new();
    run(
        &ctx.context,
        Method::Post,
        "/orders",
        Some("{}"),
        &[],
        OutputFormat::Text,
    )
    .unwrap();

    assert_eq!(ctx.context.open_queue().unwrap().count(), 1);
}
