// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn test_empty_file_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.queue.max_size, 100);
    assert_eq!(config.queue.max_retries, 3);
    assert_eq!(config.queue.storage_key, "offline_queue");
    assert_eq!(config.connectivity.mode, ConnectivityMode::Polling);
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
}

#[test]
fn test_full_file() {
    let config = Config::parse(
        r#"
[backend]
base_url = "https://pos.example.com/api"
token_env = "POS_TOKEN"

[backend.headers]
X-Store-Id = "12"

[queue]
max_size = 50
max_retries = 5
storage_key = "admin_offline_queue"

[connectivity]
mode = "events"
poll_interval_secs = 30
probe_path = "/health"
"#,
    )
    .unwrap();

    assert_eq!(config.backend.base_url, "https://pos.example.com/api");
    assert_eq!(config.backend.headers["X-Store-Id"], "12");
    assert_eq!(config.policy(), QueuePolicy::new(50, 5));
    assert_eq!(config.queue.storage_key, "admin_offline_queue");
    assert_eq!(config.connectivity.mode, ConnectivityMode::Events);
    assert_eq!(
        config.probe_url().as_deref(),
        Some("https://pos.example.com/api/health")
    );
}

#[parameterized(
    bad_scheme = { "[backend]\nbase_url = \"ftp://pos\"" },
    zero_size = { "[queue]\nmax_size = 0" },
    zero_retries = { "[queue]\nmax_retries = 0" },
    blank_key = { "[queue]\nstorage_key = \" \"" },
    zero_interval = { "[connectivity]\npoll_interval_secs = 0" },
    unknown_field = { "[queue]\nmax = 3" },
    unknown_mode = { "[connectivity]\nmode = \"push\"" },
    not_toml = { "[queue" },
)]
fn test_invalid_config(content: &str) {
    let err = Config::parse(content).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_load_missing_file_is_default() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(&temp.path().join("nope.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_error_names_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[queue]\nmax_size = \"lots\"").unwrap();

    let msg = Config::load(&path).unwrap_err().to_string();
    assert!(msg.contains("config.toml"));
}

#[test]
fn test_token_file_wins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("token");
    fs::write(&path, "from-file\n").unwrap();

    let mut config = Config::default();
    config.backend.token = Some("inline".to_string());
    config.backend.token_file = Some(path);

    assert_eq!(config.credentials().current_token().as_deref(), Some("from-file"));
}

#[test]
fn test_inline_token() {
    let mut config = Config::default();
    config.backend.token = Some("inline".to_string());
    assert_eq!(config.credentials().current_token().as_deref(), Some("inline"));
}

#[test]
fn test_no_probe_by_default() {
    assert_eq!(Config::default().probe_url(), None);
}

#[test]
fn test_flag_overrides_paths() {
    let flag = Path::new("/srv/rinse/config.toml");
    assert_eq!(resolve_config_path(Some(flag)).unwrap(), flag);

    let state = Path::new("/srv/rinse/state");
    assert_eq!(resolve_state_dir(Some(state)).unwrap(), state);
}

#[test]
fn test_roundtrip_through_toml() {
    let mut config = Config::default();
    config.backend.headers.insert("X-Store-Id".to_string(), "3".to_string());
    let text = toml::to_string_pretty(&config).unwrap();
    assert_eq!(Config::parse(&text).unwrap(), config);
}
