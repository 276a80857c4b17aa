// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rq_core::{FixedClock, MemoryStore, PersistenceStore, QueuedRequest, StoreFuture};

use crate::error::OperationError;
use crate::logging::ErrorSink;
use crate::queue::RequestQueue;
use crate::scheduler::{ExecuteFuture, RetryExecutor};

pub const TEST_KEY: &str = "offline_queue";

/// Sink that remembers every reported failure.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reported `(context, message)` pairs in order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl ErrorSink for RecordingSink {
    fn log_error(&self, error: &dyn std::error::Error, context: &str) {
        self.entries.lock().unwrap().push((context.to_string(), error.to_string()));
    }
}

/// Executor whose result per url is scripted; unscripted calls succeed.
#[derive(Default)]
pub struct ScriptedExecutor {
    scripts: Mutex<HashMap<String, VecDeque<Result<(), OperationError>>>>,
    always_fail: Mutex<HashMap<String, OperationError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue results for `url`, consumed one per call.
    pub fn script(&self, url: &str, outcomes: Vec<Result<(), OperationError>>) {
        self.scripts.lock().unwrap().entry(url.to_string()).or_default().extend(outcomes);
    }

    /// Every call for `url` fails with a network error.
    pub fn fail_always(&self, url: &str) {
        self.always_fail
            .lock()
            .unwrap()
            .insert(url.to_string(), OperationError::network("unreachable"));
    }

    /// Urls executed, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| u.as_str() == url).count()
    }
}

impl RetryExecutor for ScriptedExecutor {
    fn execute<'a>(&'a self, request: &'a QueuedRequest) -> ExecuteFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request.url.clone());
            if let Some(err) = self.always_fail.lock().unwrap().get(&request.url) {
                return Err(err.clone());
            }
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&request.url)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Ok(()))
        })
    }
}

/// Store whose reads and/or writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl PersistenceStore for FlakyStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(rq_core::Error::Store("read failed".into()));
            }
            self.inner.get(key).await
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(rq_core::Error::Store("write failed".into()));
            }
            self.inner.set(key, value).await
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.inner.remove(key).await })
    }
}

/// Queue over `store` with a frozen clock at t=1000.
pub fn make_queue(
    store: Arc<dyn PersistenceStore>,
    sink: Arc<dyn ErrorSink>,
) -> Arc<RequestQueue> {
    Arc::new(RequestQueue::new(store, TEST_KEY, Arc::new(FixedClock::new(1000)), sink))
}
