// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the requeue library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("cannot determine state directory\n  hint: pass --state-dir or set REQUEUE_STATE_DIR")]
    NoStateDir,

    #[error("service has been shut down")]
    ShutDown,

    #[error(transparent)]
    Core(#[from] rq_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for requeue operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a network operation or by the retry executor.
///
/// The variant, not the message, decides whether the failure is worth
/// queueing: network-like failures are retried later, domain failures are
/// returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// No usable network path, connection reset, DNS failure, etc.
    #[error("network failure: {0}")]
    Network(String),

    /// The remote did not answer in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The remote answered and rejected the request.
    #[error("{0}")]
    Domain(String),
}

impl OperationError {
    pub fn network(message: impl Into<String>) -> Self {
        OperationError::Network(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        OperationError::Timeout(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        OperationError::Domain(message.into())
    }
}

/// Classifies an operation failure as network-related or not.
///
/// Implement this for the caller's own error type to use it with
/// [`OfflineGuard`](crate::OfflineGuard).
pub trait Classify {
    /// Returns true if the failure means the request never reached the
    /// remote (and is therefore safe to queue and retry).
    fn is_network_failure(&self) -> bool;
}

impl Classify for OperationError {
    fn is_network_failure(&self) -> bool {
        matches!(self, OperationError::Network(_) | OperationError::Timeout(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
