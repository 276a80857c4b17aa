// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of hash bytes kept for the random suffix (9 hex chars after truncation).
const SUFFIX_BYTES: usize = 5;
const SUFFIX_LEN: usize = 9;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a request ID from the enqueue timestamp.
/// Format: {timestamp_ms}-{suffix} where suffix is 9 hex chars of
/// SHA256(timestamp + process-wide sequence + sub-second nanos + pid).
pub fn generate_request_id(timestamp_ms: i64) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let input = format!("{}:{}:{}:{}", timestamp_ms, sequence, nanos, std::process::id());
    let hash = Sha256::digest(input.as_bytes());
    let mut suffix = hex::encode(&hash[..SUFFIX_BYTES]);
    suffix.truncate(SUFFIX_LEN);
    format!("{}-{}", timestamp_ms, suffix)
}

/// Generate a request ID that `exists` does not report as taken.
///
/// Every call draws a fresh sequence number, so a collision simply retries.
pub fn generate_unique_id<F>(timestamp_ms: i64, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_request_id(timestamp_ms);
        if !exists(&id) {
            return id;
        }
    }
}

/// Extract the enqueue timestamp embedded in a request ID.
pub fn timestamp_of(id: &str) -> Option<i64> {
    let (ts, suffix) = id.split_once('-')?;
    if suffix.len() != SUFFIX_LEN || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    ts.parse().ok()
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
