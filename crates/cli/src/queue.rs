// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline request queue mirrored to a [`PersistenceStore`].
//!
//! The queue is an ordered list held in memory and rewritten wholesale to a
//! single storage key after every mutation. Storage failures are reported to
//! the [`ErrorSink`] and never surface to callers: the in-memory list stays
//! authoritative and the next successful write catches the store up.
//!
//! During a drain pass the items being retried are held aside (in flight).
//! They do not count towards [`RequestQueue::size`], but they are still part
//! of every persisted write, so a crash mid-drain loses nothing.

use std::sync::Arc;

use rq_core::blob::{decode_queue_checked, duplicate_error, encode_queue};
use rq_core::id::generate_unique_id;
use rq_core::{ClockSource, PersistenceStore, QueuedRequest, RequestDescriptor};
use tokio::sync::{watch, Mutex};

use crate::listeners::{Listeners, Subscription};
use crate::logging::ErrorSink;

#[derive(Default)]
struct QueueState {
    /// Live queue.
    items: Vec<QueuedRequest>,
    /// Snapshot items of the running drain pass not yet settled.
    in_flight: Vec<QueuedRequest>,
    /// Number of items at the front of `items` put back by the running pass.
    held: usize,
}

impl QueueState {
    fn contains(&self, id: &str) -> bool {
        self.items.iter().chain(self.in_flight.iter()).any(|r| r.id == id)
    }

    /// Full pending set in processing order: requeued items, then the
    /// unsettled remainder of the pass, then items enqueued during the pass.
    fn ordered(&self) -> Vec<QueuedRequest> {
        let held = self.held.min(self.items.len());
        let mut all = Vec::with_capacity(self.items.len() + self.in_flight.len());
        all.extend_from_slice(&self.items[..held]);
        all.extend_from_slice(&self.in_flight);
        all.extend_from_slice(&self.items[held..]);
        all
    }

    /// Folds any in-flight items back into the live queue.
    fn collapse(&mut self) {
        if !self.in_flight.is_empty() {
            self.items = self.ordered();
            self.in_flight.clear();
        }
        self.held = 0;
    }
}

/// Durable, ordered store of deferred requests.
pub struct RequestQueue {
    store: Arc<dyn PersistenceStore>,
    key: String,
    clock: Arc<dyn ClockSource>,
    sink: Arc<dyn ErrorSink>,
    state: Mutex<QueueState>,
    size_tx: watch::Sender<usize>,
    listeners: Listeners<usize>,
}

impl RequestQueue {
    pub fn new(
        store: Arc<dyn PersistenceStore>,
        key: impl Into<String>,
        clock: Arc<dyn ClockSource>,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        let (size_tx, _) = watch::channel(0);
        RequestQueue {
            store,
            key: key.into(),
            clock,
            listeners: Listeners::new("queue size listener", Arc::clone(&sink)),
            sink,
            state: Mutex::new(QueueState::default()),
            size_tx,
        }
    }

    /// Storage key the queue blob lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the in-memory queue with the persisted one.
    ///
    /// A missing blob is an empty queue. An unreadable or corrupt blob is
    /// reported and also treated as empty (fail-open); it is left in place
    /// until the next write overwrites it. Entries repeating an earlier id
    /// are skipped and reported; the rest of the queue is kept.
    pub async fn load(&self) -> usize {
        let mut state = self.state.lock().await;

        let items = match self.store.get(&self.key).await {
            Ok(Some(blob)) => match decode_queue_checked(&blob) {
                Ok(decoded) => {
                    for id in &decoded.duplicates {
                        tracing::warn!(key = %self.key, %id, "skipping duplicate queued request");
                        self.sink.log_error(&duplicate_error(id), "load offline queue");
                    }
                    decoded.items
                }
                Err(e) => {
                    tracing::warn!(key = %self.key, "discarding unreadable offline queue: {}", e);
                    self.sink.log_error(&e, "load offline queue");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "failed to read offline queue: {}", e);
                self.sink.log_error(&e, "load offline queue");
                Vec::new()
            }
        };

        *state = QueueState { items, ..QueueState::default() };
        let len = state.items.len();
        tracing::debug!(len, "loaded offline queue");
        self.publish(len);
        len
    }

    /// Appends a request built from `descriptor` and persists the queue.
    ///
    /// Never fails; the returned record carries the assigned id.
    pub async fn enqueue(&self, descriptor: RequestDescriptor) -> QueuedRequest {
        let mut state = self.state.lock().await;

        let timestamp = self.clock.now_ms();
        let id = generate_unique_id(timestamp, |candidate| state.contains(candidate));
        let request = QueuedRequest::new(id, descriptor, timestamp);
        state.items.push(request.clone());

        self.persist(&state).await;
        tracing::debug!(id = %request.id, method = %request.method, url = %request.url, "queued request");
        self.publish(state.items.len());
        request
    }

    /// Number of items in the live queue.
    pub fn size(&self) -> usize {
        *self.size_tx.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Every pending request in processing order, including those a running
    /// drain pass has not settled yet.
    pub async fn items(&self) -> Vec<QueuedRequest> {
        self.state.lock().await.ordered()
    }

    /// Drops every pending request and persists the empty queue.
    ///
    /// Items a running drain pass is still holding are dropped too; the pass
    /// will not put them back.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let dropped = state.items.len() + state.in_flight.len();
        *state = QueueState::default();
        self.persist(&state).await;
        tracing::info!(dropped, "cleared offline queue");
        self.publish(0);
    }

    /// Folds interrupted drain state back into the queue and persists it.
    pub async fn flush(&self) {
        let mut state = self.state.lock().await;
        state.collapse();
        self.persist(&state).await;
        self.publish(state.items.len());
    }

    /// Registers `callback` to receive the new size on every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.listeners.subscribe(move |size: &usize| callback(*size))
    }

    /// Watch channel mirroring [`RequestQueue::size`].
    pub fn watch(&self) -> watch::Receiver<usize> {
        self.size_tx.subscribe()
    }

    /// Moves the live queue into flight and returns it as the pass snapshot.
    pub(crate) async fn begin_drain(&self) -> Vec<QueuedRequest> {
        let mut state = self.state.lock().await;
        state.collapse();
        let snapshot = std::mem::take(&mut state.items);
        state.in_flight = snapshot.clone();
        self.publish(0);
        snapshot
    }

    /// Settles one in-flight item: dropped when `requeue` is `None`, otherwise
    /// put back ahead of anything enqueued since the pass began.
    ///
    /// Returns false if the item was no longer in flight (the queue was
    /// cleared meanwhile); nothing is put back in that case.
    pub(crate) async fn settle(&self, id: &str, requeue: Option<QueuedRequest>) -> bool {
        let mut state = self.state.lock().await;

        let Some(pos) = state.in_flight.iter().position(|r| r.id == id) else {
            return false;
        };
        state.in_flight.remove(pos);

        if let Some(item) = requeue {
            let at = state.held.min(state.items.len());
            state.items.insert(at, item);
            state.held = at + 1;
            self.publish(state.items.len());
        }
        true
    }

    /// Ends the pass and persists whatever remains.
    pub(crate) async fn finish_drain(&self) {
        self.flush().await;
    }

    async fn persist(&self, state: &QueueState) {
        let result = match encode_queue(&state.ordered()) {
            Ok(blob) => self.store.set(&self.key, blob).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!(key = %self.key, "failed to persist offline queue: {}", e);
            self.sink.log_error(&e, "persist offline queue");
        }
    }

    fn publish(&self, len: usize) {
        let changed = self.size_tx.send_if_modified(|current| {
            if *current == len {
                false
            } else {
                *current = len;
                true
            }
        });
        if changed {
            self.listeners.notify(&len);
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
