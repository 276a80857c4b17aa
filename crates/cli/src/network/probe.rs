// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reachability probe: a connectivity signal for hosts without a platform
//! network-state API. A TCP connect to a known address stands in for
//! "usable network reachable".

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;

use super::signal::{ConnectivityEvent, ConnectivitySignal, SignalFuture};

/// Signal that probes `address` with a TCP connect.
#[derive(Debug, Clone)]
pub struct ProbeSignal {
    address: String,
    interval: Duration,
    timeout: Duration,
}

impl ProbeSignal {
    pub fn new(address: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        ProbeSignal { address: address.into(), interval, timeout }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn probe(&self) -> ConnectivityEvent {
        let reached =
            matches!(tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await, Ok(Ok(_)));
        tracing::trace!(address = %self.address, reached, "connectivity probe");
        ConnectivityEvent { connected: reached, internet_reachable: Some(reached) }
    }
}

impl ConnectivitySignal for ProbeSignal {
    fn fetch(&self) -> SignalFuture<'_, ConnectivityEvent> {
        Box::pin(self.probe())
    }

    /// Spawns a polling task that reports only changes. The task exits once
    /// the receiver is dropped. Must be called from within a tokio runtime.
    fn listen(&self) -> mpsc::UnboundedReceiver<ConnectivityEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let probe = self.clone();

        tokio::spawn(async move {
            let mut last: Option<ConnectivityEvent> = None;
            let mut ticker = tokio::time::interval(probe.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }
                let event = probe.probe().await;
                if last != Some(event) {
                    last = Some(event);
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        rx
    }
}
