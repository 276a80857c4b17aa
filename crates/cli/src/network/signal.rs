// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Platform connectivity signal abstraction.
//!
//! Provides a trait-based signal that enables:
//! - Real reachability probing for production ([`ProbeSignal`](super::ProbeSignal))
//! - Programmatic control for tests and embedders ([`ManualSignal`])

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc;

/// Boxed future returned by [`ConnectivitySignal::fetch`].
pub type SignalFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One connectivity report from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectivityEvent {
    /// A network interface is up.
    pub connected: bool,
    /// Whether the internet is reachable over it, if the platform knows.
    pub internet_reachable: Option<bool>,
}

impl ConnectivityEvent {
    pub fn online() -> Self {
        ConnectivityEvent { connected: true, internet_reachable: Some(true) }
    }

    pub fn offline() -> Self {
        ConnectivityEvent { connected: false, internet_reachable: Some(false) }
    }

    pub fn from_online(online: bool) -> Self {
        if online {
            Self::online()
        } else {
            Self::offline()
        }
    }

    /// A usable network path exists: connected, and reachability not known to be false.
    pub fn is_online(&self) -> bool {
        self.connected && self.internet_reachable != Some(false)
    }
}

/// Source of connectivity reports.
pub trait ConnectivitySignal: Send + Sync {
    /// Actively queries current connectivity.
    fn fetch(&self) -> SignalFuture<'_, ConnectivityEvent>;

    /// Opens a stream of connectivity change reports.
    ///
    /// The stream ends when the signal is dropped or stops reporting.
    fn listen(&self) -> mpsc::UnboundedReceiver<ConnectivityEvent>;
}

struct ManualState {
    current: ConnectivityEvent,
    listeners: Vec<mpsc::UnboundedSender<ConnectivityEvent>>,
}

/// Signal driven by explicit calls. Clones share state.
#[derive(Clone)]
pub struct ManualSignal {
    state: Arc<Mutex<ManualState>>,
}

impl ManualSignal {
    pub fn new(online: bool) -> Self {
        ManualSignal {
            state: Arc::new(Mutex::new(ManualState {
                current: ConnectivityEvent::from_online(online),
                listeners: Vec::new(),
            })),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.emit(ConnectivityEvent::from_online(online));
    }

    /// Updates the current state and reports it to every open stream,
    /// even if it is unchanged.
    pub fn emit(&self, event: ConnectivityEvent) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.current = event;
        state.listeners.retain(|tx| tx.send(event).is_ok());
    }

    /// Updates the current state without reporting it, as if the platform
    /// changed but has not yet delivered the event.
    pub fn set_silently(&self, online: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).current =
            ConnectivityEvent::from_online(online);
    }

    pub fn current(&self) -> ConnectivityEvent {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).current
    }

    /// Ends every open stream.
    pub fn close(&self) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).listeners.clear();
    }
}

impl ConnectivitySignal for ManualSignal {
    fn fetch(&self) -> SignalFuture<'_, ConnectivityEvent> {
        let current = self.current();
        Box::pin(async move { current })
    }

    fn listen(&self) -> mpsc::UnboundedReceiver<ConnectivityEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().unwrap_or_else(|e| e.into_inner()).listeners.push(tx);
        rx
    }
}
