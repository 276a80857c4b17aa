// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Failure reporting and log setup.

use tracing_subscriber::EnvFilter;

/// Fire-and-forget sink for failures the subsystem swallows.
///
/// Storage glitches, listener panics and exhausted retries are handed here
/// instead of being returned to the caller. Implementations must not panic.
pub trait ErrorSink: Send + Sync {
    fn log_error(&self, error: &dyn std::error::Error, context: &str);
}

/// Default sink: forwards to `tracing::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn log_error(&self, error: &dyn std::error::Error, context: &str) {
        tracing::error!(context, "{}", error);
    }
}

/// Error raised when a subscriber callback panics.
#[derive(Debug, thiserror::Error)]
#[error("listener panicked: {0}")]
pub struct ListenerPanic(pub String);

/// Installs the global tracing subscriber for the binary.
///
/// Honors `RUST_LOG`; defaults to `warn`. Output goes to stderr so command
/// output on stdout stays machine-readable.
pub fn setup_logging() {
    let filter = crate::env::log_filter()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
