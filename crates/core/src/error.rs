// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for rq-core operations.

use thiserror::Error;

/// All possible errors that can occur in rq-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid storage key: '{0}'\n  hint: keys may only contain letters, digits, '_', '-' and '.'")]
    InvalidKey(String),

    #[error("invalid method: '{0}'\n  hint: valid methods are: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS")]
    InvalidMethod(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("store error: {0}")]
    Store(String),
}

/// A specialized Result type for rq-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
