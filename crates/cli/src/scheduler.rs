// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drain pass: retries queued requests once connectivity returns.
//!
//! Per item: `Pending → Attempting → Succeeded | Requeued | Exhausted`.
//! A requeued item goes back to pending with its retry count bumped; the
//! pass then waits a fixed delay before the next attempt. Items found while
//! offline are put back untouched (deferred).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use rq_core::QueuedRequest;
use tokio::sync::Mutex;

use crate::error::OperationError;
use crate::logging::ErrorSink;
use crate::network::NetworkMonitor;
use crate::queue::RequestQueue;

/// Failed attempts after which a queued request is abandoned.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Pause after a failed attempt before the next item is tried.
pub const RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Boxed future returned by [`RetryExecutor::execute`].
pub type ExecuteFuture<'a> = Pin<Box<dyn Future<Output = Result<(), OperationError>> + Send + 'a>>;

/// Performs a deferred request.
pub trait RetryExecutor: Send + Sync {
    fn execute<'a>(&'a self, request: &'a QueuedRequest) -> ExecuteFuture<'a>;
}

/// Retry ceiling and inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { max_attempts: MAX_RETRY_ATTEMPTS, delay: RETRY_DELAY }
    }
}

/// What happened to each item of one drain pass, by request id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub succeeded: Vec<String>,
    /// Failed, put back with an incremented retry count.
    pub requeued: Vec<String>,
    /// Not attempted because connectivity was down.
    pub deferred: Vec<String>,
    /// Reached the retry ceiling and were dropped.
    pub exhausted: Vec<String>,
    /// Live queue length when the pass finished.
    pub remaining: usize,
}

impl DrainReport {
    /// Number of items the executor was invoked for.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.requeued.len() + self.exhausted.len()
    }
}

/// Walks the queue and retries each request.
pub struct RetryScheduler {
    queue: Arc<RequestQueue>,
    monitor: Arc<NetworkMonitor>,
    executor: Arc<dyn RetryExecutor>,
    policy: RetryPolicy,
    sink: Arc<dyn ErrorSink>,
    /// Held for the duration of a pass; passes never overlap.
    pass: Mutex<()>,
}

impl RetryScheduler {
    pub fn new(
        queue: Arc<RequestQueue>,
        monitor: Arc<NetworkMonitor>,
        executor: Arc<dyn RetryExecutor>,
        policy: RetryPolicy,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        RetryScheduler { queue, monitor, executor, policy, sink, pass: Mutex::new(()) }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Runs one drain pass over a snapshot of the queue.
    ///
    /// Requests enqueued while the pass runs are not part of it. If another
    /// pass is running, this one waits for it to finish first.
    pub async fn drain(&self) -> DrainReport {
        let _pass = self.pass.lock().await;
        let mut report = DrainReport::default();

        let snapshot = self.queue.begin_drain().await;
        if snapshot.is_empty() {
            self.queue.finish_drain().await;
            report.remaining = self.queue.size();
            return report;
        }

        tracing::info!(count = snapshot.len(), "draining offline queue");

        for mut item in snapshot {
            if !self.monitor.is_online() {
                let id = item.id.clone();
                tracing::debug!(%id, "offline, deferring queued request");
                if self.queue.settle(&id, Some(item)).await {
                    report.deferred.push(id);
                }
                continue;
            }

            match self.executor.execute(&item).await {
                Ok(()) => {
                    tracing::debug!(id = %item.id, "queued request succeeded");
                    self.queue.settle(&item.id, None).await;
                    report.succeeded.push(item.id);
                }
                Err(error) => {
                    let attempts = item.record_failure();
                    let id = item.id.clone();

                    if item.is_exhausted(self.policy.max_attempts) {
                        tracing::error!(
                            %id, attempts, url = %item.url,
                            "dropping queued request after max retry attempts: {}", error
                        );
                        self.queue.settle(&id, None).await;
                        self.sink.log_error(&error, "queued request exhausted retries");
                        report.exhausted.push(id);
                    } else {
                        tracing::warn!(
                            %id, attempts, max = self.policy.max_attempts,
                            "queued request failed, will retry: {}", error
                        );
                        if self.queue.settle(&id, Some(item)).await {
                            report.requeued.push(id);
                        }
                        if !self.policy.delay.is_zero() {
                            tokio::time::sleep(self.policy.delay).await;
                        }
                    }
                }
            }
        }

        self.queue.finish_drain().await;
        report.remaining = self.queue.size();

        tracing::info!(
            succeeded = report.succeeded.len(),
            requeued = report.requeued.len(),
            deferred = report.deferred.len(),
            exhausted = report.exhausted.len(),
            remaining = report.remaining,
            "drain pass finished"
        );
        report
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
