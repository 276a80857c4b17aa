// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking.
//!
//! ```text
//! ┌──────────────────────┐  events   ┌────────────────┐  Fn(bool)  ┌─────────────┐
//! │ ConnectivitySignal   │──────────►│ NetworkMonitor │───────────►│ subscribers │
//! │ (Manual / Probe)     │◄──────────│ (cached flag)  │            └─────────────┘
//! └──────────────────────┘   fetch   └───────┬────────┘
//!                                            │ offline → online
//!                                            ▼
//!                                     reconnect channel (drain trigger)
//! ```

mod monitor;
mod probe;
mod signal;

pub use monitor::{NetworkMonitor, ReconnectEvents, Transition};
pub use probe::ProbeSignal;
pub use signal::{ConnectivityEvent, ConnectivitySignal, ManualSignal, SignalFuture};
