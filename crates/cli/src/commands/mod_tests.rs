// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for command tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rq_core::{FileStore, FixedClock, RequestDescriptor};
use tempfile::TempDir;

use super::{queue_dir, Context};
use crate::config::Config;
use crate::logging::TracingSink;
use crate::queue::RequestQueue;

/// A context over a fresh temporary state directory.
pub struct TestContext {
    _temp: TempDir,
    pub ctx: Context,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let temp = TempDir::new().unwrap();
        let ctx = Context { state_dir: temp.path().to_path_buf(), config };
        TestContext { _temp: temp, ctx }
    }

    /// Enqueues `urls` into the persisted queue at a fixed time.
    pub async fn seed(&self, urls: &[&str]) {
        let store = FileStore::open(&queue_dir(&self.ctx.state_dir)).unwrap();
        let queue = RequestQueue::new(
            Arc::new(store),
            self.ctx.config.storage_key.clone(),
            Arc::new(FixedClock::new(1_767_225_600_000)),
            Arc::new(TracingSink),
        );
        queue.load().await;
        for url in urls {
            queue.enqueue(RequestDescriptor::get(*url)).await;
        }
    }

    pub async fn pending(&self) -> usize {
        self.ctx.open_queue().await.unwrap().size()
    }
}

#[test]
fn plural_forms() {
    assert_eq!(super::plural(0, "request"), "0 requests");
    assert_eq!(super::plural(1, "request"), "1 request");
    assert_eq!(super::plural(2, "request"), "2 requests");
}
