// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use rinse_core::{ActionStatus, Method};

use crate::config::ConnectivityMode;

pub use args::OutputArgs;
use args::{parse_endpoint, parse_method, parse_status};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "rinse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline action queue and sync engine for the laundry POS")]
#[command(
    long_about = "Offline action queue and sync engine for the laundry POS.\n\n\
    Writes that cannot reach the backend are queued on disk and replayed in order \
    once the terminal is back online."
)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/rinse/config.toml)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Directory holding the queue database (default: $XDG_STATE_HOME/rinse)
    #[arg(long = "state-dir", global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Queue a write for later replay
    #[command(after_help = "\
Examples:
  rinse enqueue POST /orders --body '{\"customer\":12,\"items\":3}'
  rinse enqueue PUT /orders/123 -b '{\"status\":\"ready\"}' -H X-Store-Id:4
  rinse enqueue delete /orders/123/items/7")]
    Enqueue {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        #[arg(value_parser = parse_method)]
        method: Method,

        /// Backend path, relative to the configured base URL
        #[arg(value_parser = parse_endpoint)]
        endpoint: String,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,

        /// Extra header as NAME:VALUE (repeatable)
        #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
        headers: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List queued actions in replay order
    List {
        /// Only show actions with this status (pending, processing, failed)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<ActionStatus>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show queue counts
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replay pending actions once
    Sync {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Reset failed actions to pending and replay
    RetryFailed {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove one queued action
    Remove {
        /// Action ID as shown by 'rinse list'
        id: String,
    },

    /// Remove every queued action
    Clear,

    /// Watch connectivity and replay until interrupted
    Watch {
        /// Override the configured connectivity mode
        #[arg(long, value_enum)]
        mode: Option<ConnectivityMode>,

        /// Override the polling interval in seconds
        #[arg(long, value_name = "secs", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Default log level when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Command::Watch { .. } => "info",
            _ => "warn",
        }
    }
}

#[cfg(test)]
#[path = "../cli_tests.rs"]
mod tests;
