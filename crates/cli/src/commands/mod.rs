// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod config;
pub mod list;
pub mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rq_core::{FileStore, SystemClock};

use crate::config::{resolve_state_dir, Config};
use crate::error::Result;
use crate::logging::TracingSink;
use crate::queue::RequestQueue;

const QUEUE_DIR_NAME: &str = "queue";

/// Resolved state directory and the configuration found there.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn open(explicit: Option<&Path>) -> Result<Self> {
        let state_dir = resolve_state_dir(explicit)?;
        let config = Config::load(&state_dir)?;
        Ok(Context { state_dir, config })
    }

    /// Directory the persisted queue blob lives in.
    pub fn queue_dir(&self) -> PathBuf {
        queue_dir(&self.state_dir)
    }

    /// Opens and loads the persisted queue.
    pub async fn open_queue(&self) -> Result<RequestQueue> {
        let store = FileStore::open(&self.queue_dir())?;
        let queue = RequestQueue::new(
            Arc::new(store),
            self.config.storage_key.clone(),
            Arc::new(SystemClock),
            Arc::new(TracingSink),
        );
        queue.load().await;
        Ok(queue)
    }
}

/// Queue directory for a given state directory.
pub fn queue_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(QUEUE_DIR_NAME)
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
