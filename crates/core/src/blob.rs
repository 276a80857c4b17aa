// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue blob codec.
//!
//! The whole queue is persisted as a single JSON array under one storage key
//! and is always rewritten wholesale, never appended to.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::request::QueuedRequest;

/// Serializes the queue, in order, into a blob.
pub fn encode_queue(items: &[QueuedRequest]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// A decoded blob plus the ids of repeated entries that were skipped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedQueue {
    pub items: Vec<QueuedRequest>,
    /// Ids seen more than once; only the first occurrence is kept.
    pub duplicates: Vec<String>,
}

/// Parses a blob back into queue order.
///
/// An empty or whitespace-only blob is an empty queue. A repeated id keeps
/// its first occurrence; later ones are skipped and listed in
/// [`DecodedQueue::duplicates`].
pub fn decode_queue_checked(blob: &str) -> Result<DecodedQueue> {
    if blob.trim().is_empty() {
        return Ok(DecodedQueue::default());
    }

    let parsed: Vec<QueuedRequest> = serde_json::from_str(blob)?;

    let mut seen = HashSet::with_capacity(parsed.len());
    let mut decoded = DecodedQueue::default();
    for item in parsed {
        if seen.insert(item.id.clone()) {
            decoded.items.push(item);
        } else {
            decoded.duplicates.push(item.id);
        }
    }

    Ok(decoded)
}

/// Like [`decode_queue_checked`], discarding the duplicate report.
pub fn decode_queue(blob: &str) -> Result<Vec<QueuedRequest>> {
    decode_queue_checked(blob).map(|decoded| decoded.items)
}

/// Error describing a skipped duplicate entry.
pub fn duplicate_error(id: &str) -> Error {
    Error::CorruptedData(format!("duplicate request id {}, later entry skipped", id))
}

#[cfg(test)]
#[path = "blob_tests.rs"]
mod tests;
