// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-style connectivity notifications.

use std::future::Future;
use std::io::BufRead;
use std::pin::Pin;
use std::str::FromStr;

use tokio::sync::mpsc;

/// A network reachability change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl FromStr for ConnectivityEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" | "up" | "connected" => Ok(ConnectivityEvent::Online),
            "offline" | "down" | "disconnected" => Ok(ConnectivityEvent::Offline),
            other => Err(format!("unknown connectivity event '{other}'")),
        }
    }
}

/// Stream of connectivity events.
pub trait ConnectivitySource: Send {
    /// Wait for the next event. `None` means the source is closed.
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<ConnectivityEvent>> + Send + '_>>;
}

/// Source fed through a channel, for hosts with native change callbacks.
pub struct ChannelSource {
    rx: mpsc::Receiver<ConnectivityEvent>,
}

impl ChannelSource {
    /// Create a source and the sender a host pushes events into.
    pub fn new(buffer: usize) -> (mpsc::Sender<ConnectivityEvent>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, ChannelSource { rx })
    }
}

impl ConnectivitySource for ChannelSource {
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<ConnectivityEvent>> + Send + '_>> {
        Box::pin(self.rx.recv())
    }
}

/// Read one event per line (`online` / `offline`), e.g. from a network
/// manager hook piped into stdin, and feed them into a [`ChannelSource`].
///
/// The reader runs on its own thread so a read that never returns cannot
/// hold up runtime shutdown. Blank and unknown lines are skipped; the
/// source closes at end of input.
pub fn spawn_line_reader<R>(reader: R, buffer: usize) -> std::io::Result<ChannelSource>
where
    R: BufRead + Send + 'static,
{
    let (tx, source) = ChannelSource::new(buffer);
    std::thread::Builder::new()
        .name("rinse-connectivity-input".to_string())
        .spawn(move || read_events(reader, &tx))?;
    Ok(source)
}

fn read_events<R: BufRead>(reader: R, tx: &mpsc::Sender<ConnectivityEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "connectivity input failed");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse() {
            Ok(event) => {
                if tx.blocking_send(event).is_err() {
                    return;
                }
            }
            Err(e) => tracing::warn!(error = %e, "ignoring connectivity line"),
        }
    }
}
