// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_unreachable_backend_is_offline() {
    let probe = HttpProbe::new("http://127.0.0.1:9/health").unwrap();
    assert_eq!(probe.url(), "http://127.0.0.1:9/health");
    assert!(!probe.check().await);
}

#[tokio::test]
async fn test_any_http_status_is_online() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/health", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = stream
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await;
    });

    let probe = HttpProbe::new(url).unwrap();
    assert!(probe.check().await);
}
