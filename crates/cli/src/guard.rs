// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point for network operations that must survive connectivity loss.

use std::future::Future;
use std::sync::Arc;

use rq_core::RequestDescriptor;

use crate::error::Classify;
use crate::network::NetworkMonitor;
use crate::queue::RequestQueue;

/// Outcome of a guarded operation that did not return a value.
#[derive(Debug, thiserror::Error)]
pub enum GuardError<E> {
    /// Offline at call time; the operation was not run.
    #[error("you are offline; the request was saved and will sync when the connection returns")]
    Queued { id: String },

    /// The operation failed with a network-like error; the request was saved.
    #[error("connection lost; the request was saved and will sync later")]
    ConnectionLost {
        id: String,
        #[source]
        source: E,
    },

    /// Any other failure, exactly as the operation returned it.
    #[error(transparent)]
    Operation(E),
}

impl<E> GuardError<E> {
    /// True when the request was queued and will be retried on reconnect.
    pub fn will_sync(&self) -> bool {
        self.queued_id().is_some()
    }

    /// Id of the queued request, if one was queued.
    pub fn queued_id(&self) -> Option<&str> {
        match self {
            GuardError::Queued { id } | GuardError::ConnectionLost { id, .. } => Some(id),
            GuardError::Operation(_) => None,
        }
    }

    /// The operation's own error, if the operation ran and failed.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            GuardError::Queued { .. } => None,
            GuardError::ConnectionLost { source, .. } => Some(source),
            GuardError::Operation(e) => Some(e),
        }
    }
}

/// Runs operations directly when online and queues them otherwise.
///
/// Never retries synchronously; queued requests are retried only by a drain
/// pass after a later reconnect.
#[derive(Clone)]
pub struct OfflineGuard {
    monitor: Arc<NetworkMonitor>,
    queue: Arc<RequestQueue>,
}

impl OfflineGuard {
    pub fn new(monitor: Arc<NetworkMonitor>, queue: Arc<RequestQueue>) -> Self {
        OfflineGuard { monitor, queue }
    }

    /// Runs `operation`, or queues `descriptor` for later when that is not possible.
    ///
    /// 1. Connectivity is re-checked against the signal.
    /// 2. Offline: `descriptor` is queued and [`GuardError::Queued`] returned;
    ///    `operation` is never invoked.
    /// 3. Online: `operation` runs. A network-like failure queues `descriptor`
    ///    and returns [`GuardError::ConnectionLost`]; any other failure is
    ///    returned as [`GuardError::Operation`].
    pub async fn execute_with_offline_support<T, E, F, Fut>(
        &self,
        operation: F,
        descriptor: RequestDescriptor,
    ) -> Result<T, GuardError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + std::fmt::Display,
    {
        if !self.monitor.check_connectivity().await {
            let request = self.queue.enqueue(descriptor).await;
            tracing::info!(id = %request.id, url = %request.url, "offline, request queued");
            return Err(GuardError::Queued { id: request.id });
        }

        match operation().await {
            Ok(value) => Ok(value),
            Err(e) if e.is_network_failure() => {
                let request = self.queue.enqueue(descriptor).await;
                tracing::warn!(id = %request.id, url = %request.url, "request failed, queued for retry: {}", e);
                Err(GuardError::ConnectionLost { id: request.id, source: e })
            }
            Err(e) => Err(GuardError::Operation(e)),
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
