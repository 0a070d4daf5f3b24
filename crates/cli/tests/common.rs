// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A state directory with a config file next to it.
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    /// Environment with no config file: every setting is a default.
    pub fn new() -> Self {
        TestEnv {
            temp: TempDir::new().unwrap(),
        }
    }

    /// Environment whose config file contains `toml`.
    pub fn with_config(toml: &str) -> Self {
        let env = Self::new();
        std::fs::write(env.config_path(), toml).unwrap();
        env
    }

    /// Environment replaying against `base_url`.
    pub fn with_backend(base_url: &str) -> Self {
        Self::with_config(&format!("[backend]\nbase_url = \"{}\"\n", base_url))
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.temp.path().join("state")
    }

    /// `rinse` isolated from the caller's config, state, and token.
    pub fn rinse(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rinse");
        cmd.env("RINSE_CONFIG", self.config_path())
            .env("RINSE_STATE_DIR", self.state_dir())
            .env("NO_PROXY", "127.0.0.1,localhost")
            .env_remove("RINSE_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Enqueue and return the new action's ID.
    pub fn enqueue(&self, method: &str, endpoint: &str) -> String {
        let output = self
            .rinse()
            .args(["enqueue", method, endpoint, "-o", "json"])
            .output()
            .unwrap();
        assert!(output.status.success(), "enqueue failed: {:?}", output);
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Queued actions as JSON.
    pub fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self.rinse().args(["list", "-o", "json"]).output().unwrap();
        assert!(output.status.success(), "list failed: {:?}", output);
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["actions"].as_array().cloned().unwrap_or_default()
    }
}

/// One request as seen by [`StubBackend`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Minimal HTTP/1.1 backend answering each connection with a scripted status.
pub struct StubBackend {
    pub base_url: String,
    seen: mpsc::Receiver<SeenRequest>,
}

impl StubBackend {
    /// Serve one connection per entry in `statuses`, then stop.
    pub fn serve(statuses: Vec<u16>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        let (tx, seen) = mpsc::channel();

        thread::spawn(move || {
            for status in statuses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let Some(request) = read_request(&mut reader) else {
                    return;
                };
                if tx.send(request).is_err() {
                    return;
                }
                let mut stream = stream;
                let _ = write!(
                    stream,
                    "HTTP/1.1 {} Stub\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    status
                );
                let _ = stream.flush();
            }
        });

        StubBackend { base_url, seen }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.try_iter().collect()
    }
}

fn read_request(reader: &mut impl BufRead) -> Option<SeenRequest> {
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':')?;
        headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }

    let length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).ok()?;

    Some(SeenRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
