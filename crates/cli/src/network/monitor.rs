// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authoritative connectivity flag and change fan-out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};

use super::signal::{ConnectivityEvent, ConnectivitySignal};
use crate::listeners::{Listeners, Subscription};
use crate::logging::ErrorSink;

/// Receiving end of the offline → online edge notifications.
pub type ReconnectEvents = mpsc::UnboundedReceiver<()>;

/// Effect of applying a connectivity reading to the cached flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    WentOffline,
    /// Was offline, now online. The only edge that triggers a drain.
    Reconnected,
}

/// Holds the single cached "online" flag and notifies subscribers when it flips.
pub struct NetworkMonitor {
    signal: Arc<dyn ConnectivitySignal>,
    online: AtomicBool,
    /// Held for a whole `apply`, so fan-out order matches update order.
    transitions: Mutex<()>,
    status_tx: watch::Sender<bool>,
    listeners: Listeners<bool>,
    reconnect_tx: mpsc::UnboundedSender<()>,
}

impl NetworkMonitor {
    /// Creates a monitor that starts out assuming it is online.
    ///
    /// Returns the monitor and the stream of reconnect edges; whoever owns
    /// the stream decides what a reconnect triggers.
    pub fn new(
        signal: Arc<dyn ConnectivitySignal>,
        sink: Arc<dyn ErrorSink>,
    ) -> (Self, ReconnectEvents) {
        let (reconnect_tx, reconnect_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(true);
        let monitor = NetworkMonitor {
            signal,
            online: AtomicBool::new(true),
            transitions: Mutex::new(()),
            status_tx,
            listeners: Listeners::new("connectivity listener", sink),
            reconnect_tx,
        };
        (monitor, reconnect_rx)
    }

    /// Last known connectivity, without querying the signal.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Registers `callback` to receive the new flag on every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.listeners.subscribe(move |online: &bool| callback(*online))
    }

    /// Watch channel mirroring the cached flag.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.status_tx.subscribe()
    }

    /// Opens the underlying signal's change stream.
    pub fn listen(&self) -> mpsc::UnboundedReceiver<ConnectivityEvent> {
        self.signal.listen()
    }

    /// Queries the signal, updates the cached flag, and returns it.
    pub async fn check_connectivity(&self) -> bool {
        let online = self.signal.fetch().await.is_online();
        self.apply(online);
        online
    }

    /// Applies a connectivity reading.
    ///
    /// Subscribers are notified only when the flag flips. An offline → online
    /// flip is also reported on the reconnect stream, exactly once per edge
    /// even when readings race.
    ///
    /// Concurrent calls are serialized: a second reading waits until every
    /// subscriber has seen the first. Callbacks may read [`Self::is_online`]
    /// but must not apply readings themselves.
    pub fn apply(&self, online: bool) -> Transition {
        let _serial = self.transitions.lock().unwrap_or_else(|e| e.into_inner());
        let was_online = self.online.swap(online, Ordering::SeqCst);
        if was_online == online {
            return Transition::Unchanged;
        }

        tracing::info!(online, "connectivity changed");
        self.status_tx.send_replace(online);
        self.listeners.notify(&online);

        if online {
            if self.reconnect_tx.send(()).is_err() {
                tracing::debug!("reconnect stream closed, no drain scheduled");
            }
            Transition::Reconnected
        } else {
            Transition::WentOffline
        }
    }
}
