// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub use requeue::{
    Config, ErrorSink, ExecuteFuture, GuardError, ManualSignal, OfflineService, OperationError,
    RetryExecutor, ServiceParts,
};
pub use rq_core::{FixedClock, MemoryStore, QueuedRequest, RequestDescriptor};

pub const KEY: &str = "offline_queue";

pub fn requeue_cmd(state_dir: &std::path::Path) -> Command {
    let mut cmd = cargo_bin_cmd!("requeue");
    cmd.arg("--state-dir").arg(state_dir).env_remove("RUST_LOG");
    cmd
}

/// Sink that remembers every reported failure as `(context, message)`.
#[derive(Default)]
pub struct Recorder {
    entries: Mutex<Vec<(String, String)>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contexts(&self) -> Vec<String> {
        self.entries.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }
}

impl ErrorSink for Recorder {
    fn log_error(&self, error: &dyn std::error::Error, context: &str) {
        self.entries.lock().unwrap().push((context.to_string(), error.to_string()));
    }
}

/// Executor with per-url scripted outcomes; unscripted calls succeed.
#[derive(Default)]
pub struct Script {
    outcomes: Mutex<HashMap<String, VecDeque<Result<(), OperationError>>>>,
    broken: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl Script {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn then(&self, url: &str, outcome: Result<(), OperationError>) {
        self.outcomes.lock().unwrap().entry(url.to_string()).or_default().push_back(outcome);
    }

    pub fn always_fail(&self, url: &str) {
        self.broken.lock().unwrap().push(url.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

impl RetryExecutor for Script {
    fn execute<'a>(&'a self, request: &'a QueuedRequest) -> ExecuteFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request.url.clone());
            if self.broken.lock().unwrap().contains(&request.url) {
                return Err(OperationError::network("connection refused"));
            }
            self.outcomes
                .lock()
                .unwrap()
                .get_mut(&request.url)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Ok(()))
        })
    }
}

/// A service over in-memory parts that tests can drive.
pub struct Harness {
    pub signal: ManualSignal,
    pub store: MemoryStore,
    pub executor: Arc<Script>,
    pub sink: Arc<Recorder>,
    pub service: OfflineService,
}

impl Harness {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, MemoryStore::new())
    }

    pub fn with_store(config: Config, store: MemoryStore) -> Self {
        let signal = ManualSignal::new(true);
        let executor = Script::new();
        let sink = Recorder::new();
        let parts = ServiceParts::new(
            Arc::new(signal.clone()),
            Arc::new(store.clone()),
            executor.clone(),
        )
        .with_sink(sink.clone())
        .with_clock(Arc::new(FixedClock::new(1_700_000_000_000)));
        let service = OfflineService::new(&config, parts).unwrap();
        Harness { signal, store, executor, sink, service }
    }

    /// Runs a never-expected operation through the guard while offline.
    pub async fn queue_offline(&self, url: &str) -> String {
        let result = self
            .service
            .execute_with_offline_support(
                || async { Err::<(), _>(OperationError::domain("operation ran while offline")) },
                RequestDescriptor::get(url),
            )
            .await;
        match result {
            Err(GuardError::Queued { id }) => id,
            Err(other) => panic!("expected Queued, got {}", other),
            Ok(()) => panic!("expected Queued, got Ok"),
        }
    }

    /// Brings the monitor back online without a signal event. Without a
    /// running watcher, the resulting reconnect edge triggers nothing.
    pub async fn reconnect_quietly(&self) {
        self.signal.set_silently(true);
        assert!(self.service.check_connectivity().await);
    }

    pub fn persisted(&self) -> Vec<QueuedRequest> {
        rq_core::blob::decode_queue(&self.store.peek(KEY).unwrap_or_default()).unwrap()
    }
}

/// Config with no pause between failed attempts.
pub fn fast_config() -> Config {
    Config { retry_delay_ms: 0, ..Config::default() }
}

/// Lets spawned tasks run until `cond` holds.
pub async fn until(cond: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached");
}
