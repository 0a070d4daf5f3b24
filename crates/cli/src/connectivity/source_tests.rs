// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::source::{spawn_line_reader, ChannelSource, ConnectivityEvent, ConnectivitySource};
use yare::parameterized;

#[parameterized(
    online = { "online", ConnectivityEvent::Online },
    up = { "UP", ConnectivityEvent::Online },
    connected = { " connected\n", ConnectivityEvent::Online },
    offline = { "offline", ConnectivityEvent::Offline },
    down = { "Down", ConnectivityEvent::Offline },
)]
fn test_parse_event(raw: &str, expected: ConnectivityEvent) {
    assert_eq!(raw.parse::<ConnectivityEvent>().unwrap(), expected);
}

#[test]
fn test_parse_unknown_event() {
    assert!("flaky".parse::<ConnectivityEvent>().is_err());
}

#[tokio::test]
async fn test_line_reader_skips_noise_and_ends_at_eof() {
    let input: &'static [u8] = b"offline\n\nwifi-changed\nonline\n";
    let mut source = spawn_line_reader(input, 4).unwrap();

    assert_eq!(source.next_event().await, Some(ConnectivityEvent::Offline));
    assert_eq!(source.next_event().await, Some(ConnectivityEvent::Online));
    assert_eq!(source.next_event().await, None);
}

#[tokio::test]
async fn test_channel_source_closes_with_sender() {
    let (tx, mut source) = ChannelSource::new(4);
    tx.send(ConnectivityEvent::Online).await.unwrap();
    drop(tx);

    assert_eq!(source.next_event().await, Some(ConnectivityEvent::Online));
    assert_eq!(source.next_event().await, None);
}

#[tokio::test]
async fn test_line_reader_stops_when_source_dropped() {
    let (done_tx, done_rx) = std::sync::mpsc::channel();
    let input = std::io::Cursor::new(b"online\n".repeat(64));
    let source = spawn_line_reader(NotifyOnDrop(input, done_tx), 1).unwrap();
    drop(source);

    done_rx
        .recv_timeout(std::time::Duration::from_secs(5))
        .unwrap();
}

/// Reader that reports when the reading thread lets go of it.
struct NotifyOnDrop<R>(R, std::sync::mpsc::Sender<()>);

impl<R: std::io::Read> std::io::Read for NotifyOnDrop<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: std::io::BufRead> std::io::BufRead for NotifyOnDrop<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.0.fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        self.0.consume(amount)
    }
}

impl<R> Drop for NotifyOnDrop<R> {
    fn drop(&mut self) {
        let _ = self.1.send(());
    }
}
