// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
use common::*;

use std::sync::Arc;

use rq_core::FileStore;

/// Persists `urls` into `<state_dir>/queue` the way a running app would.
async fn seed(state_dir: &std::path::Path, urls: &[&str]) {
    let store = FileStore::open(&state_dir.join("queue")).unwrap();
    let parts = ServiceParts::new(Arc::new(ManualSignal::new(false)), Arc::new(store), Script::new());
    let service = OfflineService::new(&Config::default(), parts).unwrap();
    service.init().await.unwrap();
    for url in urls {
        let _ = service
            .execute_with_offline_support(
                || async { Ok::<_, OperationError>(()) },
                RequestDescriptor::get(*url),
            )
            .await;
    }
    service.shutdown().await;
}

#[test]
fn status_on_fresh_state_dir() {
    let temp = TempDir::new().unwrap();
    requeue_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 0 requests"))
        .stdout(predicate::str::contains("Network: unknown"));
}

#[tokio::test]
async fn list_shows_seeded_requests_in_order() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &["/first", "/second"]).await;

    let output = requeue_cmd(temp.path()).arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.find("/first").unwrap();
    let second = stdout.find("/second").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn list_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &["/only"]).await;

    let output = requeue_cmd(temp.path()).args(["list", "-o", "json"]).output().unwrap();
    let items: Vec<QueuedRequest> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url, "/only");
}

#[tokio::test]
async fn clear_empties_queue() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &["/a", "/b", "/c"]).await;

    requeue_cmd(temp.path())
        .arg("clear")
        .assert()
        .success()
        .stdout("Cleared 3 queued requests.\n");

    requeue_cmd(temp.path())
        .args(["status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": 0"));
}

#[test]
fn config_show_reflects_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "max_retry_attempts = 5\n").unwrap();

    requeue_cmd(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_retry_attempts = 5"))
        .stdout(predicate::str::contains("storage_key = \"offline_queue\""));
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "max_retry_attempts = 0\n").unwrap();

    requeue_cmd(temp.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid config"));
}

#[test]
fn state_dir_from_environment() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "storage_key = \"outbox\"\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("requeue");
    cmd.env("REQUEUE_STATE_DIR", temp.path())
        .args(["status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"storage_key\": \"outbox\""));
}

#[test]
fn completion_generates_script() {
    let temp = TempDir::new().unwrap();
    requeue_cmd(temp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("requeue"));
}

#[test]
fn unknown_output_format_is_rejected() {
    let temp = TempDir::new().unwrap();
    requeue_cmd(temp.path()).args(["list", "-o", "xml"]).assert().failure();
}
