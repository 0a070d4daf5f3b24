// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of the offline queue against the backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Engine    │────►│  Transport  │────►│   Backend   │
//! │(SyncEngine) │◄────│   (trait)   │◄────│  REST API   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │  ▲
//!        ▼  │ token per request
//! ┌─────────────┐  ┌─────────────┐
//! │   Queue     │  │ Credentials │
//! │(ActionQueue)│  │   (trait)   │
//! └─────────────┘  └─────────────┘
//! ```
//!
//! # Features
//!
//! - Strictly sequential replay in insertion order
//! - Single-flight: overlapping triggers never run two passes
//! - Retry counting with a terminal `failed` state
//! - Fresh credential per request
//! - Injectable transport trait for testing

mod credentials;
mod engine;
mod transport;

pub use credentials::{CredentialProvider, EnvToken, NoCredentials, StaticToken, TokenFile};
pub use engine::{PassLock, SkipReason, SyncEngine, SyncReport, SyncState, DEFAULT_CONTENT_TYPE};
pub use transport::{HttpTransport, ReplayRequest, Transport, TransportError, TransportResult};

#[cfg(test)]
pub(crate) mod test_helpers;
