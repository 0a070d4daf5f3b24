// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline detection driving the sync engine.
//!
//! Two interchangeable variants, chosen when the process is composed:
//! - **Events**: a [`ConnectivitySource`] pushes [`ConnectivityEvent`]s
//! - **Polling**: a fixed tick, optionally confirmed by a [`LivenessProbe`]

mod observer;
mod probe;
mod source;

pub use observer::{ConnectivityObserver, DEFAULT_POLL_INTERVAL};
pub use probe::{HttpProbe, LivenessProbe, PROBE_TIMEOUT};
pub use source::{spawn_line_reader, ChannelSource, ConnectivityEvent, ConnectivitySource};

#[cfg(test)]
#[path = "source_tests.rs"]
mod source_tests;
