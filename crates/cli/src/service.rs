// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline request subsystem as one explicit context object.
//!
//! ```text
//! caller ──► OfflineGuard ──► (offline) RequestQueue ──► PersistenceStore
//!                 │                         ▲
//!                 ▼ (online)                │ requeue
//!             operation            RetryScheduler ◄── reconnect ── NetworkMonitor ◄── signal
//! ```
//!
//! `new` wires the parts, `init` loads the persisted queue and starts
//! watching the connectivity signal, `shutdown` stops watching and persists.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rq_core::{ClockSource, PersistenceStore, QueuedRequest, RequestDescriptor, SystemClock};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::config::Config;
use crate::error::{Classify, Error, Result};
use crate::guard::{GuardError, OfflineGuard};
use crate::listeners::Subscription;
use crate::logging::{ErrorSink, TracingSink};
use crate::network::{ConnectivityEvent, ConnectivitySignal, NetworkMonitor, ReconnectEvents};
use crate::queue::RequestQueue;
use crate::scheduler::{DrainReport, RetryExecutor, RetryScheduler};

/// External collaborators the subsystem is built from.
pub struct ServiceParts {
    pub signal: Arc<dyn ConnectivitySignal>,
    pub store: Arc<dyn PersistenceStore>,
    pub executor: Arc<dyn RetryExecutor>,
    pub sink: Arc<dyn ErrorSink>,
    pub clock: Arc<dyn ClockSource>,
}

impl ServiceParts {
    /// Parts with the tracing sink and system clock.
    pub fn new(
        signal: Arc<dyn ConnectivitySignal>,
        store: Arc<dyn PersistenceStore>,
        executor: Arc<dyn RetryExecutor>,
    ) -> Self {
        ServiceParts {
            signal,
            store,
            executor,
            sink: Arc::new(TracingSink),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }
}

/// Offline-resilient request subsystem.
pub struct OfflineService {
    monitor: Arc<NetworkMonitor>,
    queue: Arc<RequestQueue>,
    scheduler: Arc<RetryScheduler>,
    guard: OfflineGuard,
    drain_on_start: bool,
    reconnects: Mutex<Option<ReconnectEvents>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl OfflineService {
    /// Wires the subsystem. Nothing is loaded or watched until [`OfflineService::init`].
    pub fn new(config: &Config, parts: ServiceParts) -> Result<Self> {
        config.validate()?;

        let (monitor, reconnects) = NetworkMonitor::new(parts.signal, Arc::clone(&parts.sink));
        let monitor = Arc::new(monitor);
        let queue = Arc::new(RequestQueue::new(
            parts.store,
            config.storage_key.clone(),
            parts.clock,
            Arc::clone(&parts.sink),
        ));
        let scheduler = Arc::new(RetryScheduler::new(
            Arc::clone(&queue),
            Arc::clone(&monitor),
            parts.executor,
            config.retry_policy(),
            parts.sink,
        ));
        let guard = OfflineGuard::new(Arc::clone(&monitor), Arc::clone(&queue));

        Ok(OfflineService {
            monitor,
            queue,
            scheduler,
            guard,
            drain_on_start: config.drain_on_start,
            reconnects: Mutex::new(Some(reconnects)),
            watcher: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Loads the persisted queue, reads current connectivity and starts
    /// watching the signal. Calling it again is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn init(&self) -> Result<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(Error::ShutDown);
        }
        let reconnects = self.reconnects.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(reconnects) = reconnects else {
            return Ok(());
        };

        let loaded = self.queue.load().await;
        // Listen before the first fetch so no change slips between them.
        let events = self.monitor.listen();
        let online = self.monitor.check_connectivity().await;
        let drain_now = self.drain_on_start && online && loaded > 0;

        tracing::info!(loaded, online, "offline service started");

        let handle = tokio::spawn(watch_connectivity(
            Arc::clone(&self.monitor),
            Arc::clone(&self.scheduler),
            events,
            reconnects,
            drain_now,
        ));
        *self.watcher.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        Ok(())
    }

    /// Stops watching connectivity, abandons any running drain pass, and
    /// persists the queue (including items the pass had not settled).
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        let handle = self.watcher.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }

        self.queue.flush().await;
        tracing::info!(pending = self.queue.size(), "offline service stopped");
    }

    /// Current connectivity (cached).
    pub fn network_status(&self) -> bool {
        self.monitor.is_online()
    }

    /// Actively re-checks connectivity.
    pub async fn check_connectivity(&self) -> bool {
        self.monitor.check_connectivity().await
    }

    /// Registers a callback for connectivity changes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.monitor.subscribe(callback)
    }

    pub fn watch_network(&self) -> watch::Receiver<bool> {
        self.monitor.watch()
    }

    /// Current live queue length.
    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    /// Registers a callback for queue length changes.
    pub fn subscribe_queue_size<F>(&self, callback: F) -> Subscription
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.queue.subscribe(callback)
    }

    pub fn watch_queue_size(&self) -> watch::Receiver<usize> {
        self.queue.watch()
    }

    /// Pending requests in processing order.
    pub async fn queued_requests(&self) -> Vec<QueuedRequest> {
        self.queue.items().await
    }

    /// See [`OfflineGuard::execute_with_offline_support`].
    pub async fn execute_with_offline_support<T, E, F, Fut>(
        &self,
        operation: F,
        descriptor: RequestDescriptor,
    ) -> std::result::Result<T, GuardError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Classify + std::fmt::Display,
    {
        self.guard.execute_with_offline_support(operation, descriptor).await
    }

    /// Drops every queued request (user-initiated reset).
    pub async fn clear_queue(&self) {
        self.queue.clear().await;
    }

    /// Runs a drain pass now, regardless of connectivity edges.
    pub async fn drain(&self) -> DrainReport {
        self.scheduler.drain().await
    }

    pub fn guard(&self) -> &OfflineGuard {
        &self.guard
    }
}

impl Drop for OfflineService {
    fn drop(&mut self) {
        let handle = self.watcher.get_mut().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

/// Applies signal events to the monitor and starts a drain pass for every
/// reconnect edge. Passes run as separate tasks so events keep flowing while
/// a pass is in progress; the scheduler serializes them.
async fn watch_connectivity(
    monitor: Arc<NetworkMonitor>,
    scheduler: Arc<RetryScheduler>,
    mut events: mpsc::UnboundedReceiver<ConnectivityEvent>,
    mut reconnects: ReconnectEvents,
    drain_now: bool,
) {
    let mut drains = JoinSet::new();
    if drain_now {
        let scheduler = Arc::clone(&scheduler);
        drains.spawn(async move { scheduler.drain().await });
    }

    let mut signal_open = true;
    loop {
        tokio::select! {
            event = events.recv(), if signal_open => match event {
                Some(event) => {
                    monitor.apply(event.is_online());
                }
                None => {
                    tracing::debug!("connectivity signal closed");
                    signal_open = false;
                }
            },
            reconnect = reconnects.recv() => {
                if reconnect.is_none() {
                    break;
                }
                let scheduler = Arc::clone(&scheduler);
                drains.spawn(async move { scheduler.drain().await });
            }
            Some(joined) = drains.join_next(), if !drains.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        tracing::error!("drain pass panicked: {}", e);
                    }
                }
            }
        }
    }

    while drains.join_next().await.is_some() {}
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
