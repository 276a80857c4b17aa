// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred request records.
//!
//! A [`RequestDescriptor`] is the opaque description of a call the caller
//! wants performed; a [`QueuedRequest`] is that descriptor once it has been
//! accepted into the offline queue and given an id, a timestamp and a retry
//! counter. Nothing here interprets the method, url, body or headers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// HTTP method of a deferred call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// Description of a call to defer until connectivity returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        RequestDescriptor { method, url: url.into(), data: None, headers: BTreeMap::new() }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>, data: serde_json::Value) -> Self {
        Self::new(Method::Post, url).with_data(data)
    }

    pub fn put(url: impl Into<String>, data: serde_json::Value) -> Self {
        Self::new(Method::Put, url).with_data(data)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A deferred call held in the offline queue.
///
/// Serialized field names match the persisted blob schema:
/// `{id, method, url, data, headers, timestamp, retryCount}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedRequest {
    /// Unique token assigned at enqueue time; never reused.
    pub id: String,
    pub method: Method,
    pub url: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Enqueue time in milliseconds since Unix epoch.
    pub timestamp: i64,
    /// Number of failed retry attempts so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl QueuedRequest {
    /// Accepts a descriptor into the queue with a fresh retry counter.
    pub fn new(id: String, descriptor: RequestDescriptor, timestamp: i64) -> Self {
        QueuedRequest {
            id,
            method: descriptor.method,
            url: descriptor.url,
            data: descriptor.data,
            headers: descriptor.headers,
            timestamp,
            retry_count: 0,
        }
    }

    /// Returns the descriptor this request was created from.
    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor {
            method: self.method,
            url: self.url.clone(),
            data: self.data.clone(),
            headers: self.headers.clone(),
        }
    }

    /// Enqueue time as a UTC datetime, if the stored timestamp is in range.
    pub fn enqueued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Records one failed attempt and returns the new retry count.
    pub fn record_failure(&mut self) -> u32 {
        self.retry_count = self.retry_count.saturating_add(1);
        self.retry_count
    }

    /// Returns true once the retry count has reached `max_attempts`.
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.retry_count >= max_attempts
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
