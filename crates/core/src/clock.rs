// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wall clock abstraction for enqueue timestamps.

use std::sync::atomic::{AtomicI64, Ordering};

/// Trait for obtaining wall clock time (allows mocking in tests).
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> i64;
}

/// System clock implementation backed by `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A manually driven clock. Time only moves when [`FixedClock::advance`] is called.
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    /// Creates a clock frozen at the given time.
    pub fn new(now_ms: i64) -> Self {
        FixedClock { now_ms: AtomicI64::new(now_ms) }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl ClockSource for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
