// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! requeue - offline-resilient request handling.
//!
//! Requests attempted while the device is offline, or that fail with a
//! network error, are persisted to a FIFO queue and replayed when
//! connectivity returns.
//!
//! # Main Components
//!
//! - [`NetworkMonitor`] - cached online/offline flag fed by a [`ConnectivitySignal`]
//! - [`RequestQueue`] - persisted FIFO of [`QueuedRequest`](rq_core::QueuedRequest)s
//! - [`RetryScheduler`] - drains the queue through a [`RetryExecutor`] on reconnect
//! - [`OfflineGuard`] - runs an operation or queues it
//! - [`OfflineService`] - wires the above into one context object
//!
//! # Usage
//!
//! ```rust,ignore
//! use requeue::{Config, OfflineService, ServiceParts, ManualSignal};
//! use rq_core::FileStore;
//!
//! let parts = ServiceParts::new(Arc::new(signal), Arc::new(FileStore::open(dir)?), executor);
//! let service = OfflineService::new(&Config::default(), parts)?;
//! service.init().await?;
//!
//! let result = service
//!     .execute_with_offline_support(|| api.create(&post), RequestDescriptor::post("/posts", body))
//!     .await;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;
pub mod guard;
pub mod listeners;
pub mod logging;
pub mod network;
pub mod queue;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod test_helpers;

pub use cli::{Cli, Command, ConfigCommand, OutputFormat};
pub use config::{Config, ProbeConfig};
pub use error::{Classify, Error, OperationError, Result};
pub use guard::{GuardError, OfflineGuard};
pub use listeners::Subscription;
pub use logging::{setup_logging, ErrorSink, TracingSink};
pub use network::{ConnectivityEvent, ConnectivitySignal, ManualSignal, NetworkMonitor, ProbeSignal};
pub use queue::RequestQueue;
pub use scheduler::{DrainReport, ExecuteFuture, RetryExecutor, RetryPolicy, RetryScheduler};
pub use service::{OfflineService, ServiceParts};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let state_dir = cli.state_dir.as_deref();

    match cli.command {
        Command::Status { output } => runtime.block_on(commands::status::run(state_dir, output)),
        Command::List { output } => runtime.block_on(commands::list::run(state_dir, output)),
        Command::Clear => runtime.block_on(commands::clear::run(state_dir)),
        Command::Config(cmd) => commands::config::run(state_dir, cmd),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "requeue", &mut std::io::stdout());
            Ok(())
        }
    }
}
