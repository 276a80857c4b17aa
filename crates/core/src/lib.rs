// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rq-core: Shared data model for the requeue offline request subsystem.
//!
//! This crate provides the queued request record, request id generation,
//! the persisted queue blob format, and the key/value stores the queue is
//! mirrored to. It has no knowledge of connectivity or retry policy.

pub mod blob;
pub mod clock;
pub mod error;
pub mod id;
pub mod request;
pub mod store;

pub use clock::{ClockSource, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use request::{Method, QueuedRequest, RequestDescriptor};
pub use store::{FileStore, MemoryStore, PersistenceStore, StoreFuture};
