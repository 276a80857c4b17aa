// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Callback registry used for connectivity and queue-size notifications.
//!
//! Callbacks run synchronously on the notifying task, in registration
//! order. A panicking callback is caught, reported to the [`ErrorSink`],
//! and does not stop the remaining callbacks from running.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use crate::logging::{ErrorSink, ListenerPanic};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    entries: BTreeMap<u64, Callback<T>>,
}

/// Removal half of a registry, type-erased so [`Subscription`] is not generic.
trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
}

impl<T: 'static> Detach for Mutex<Registry<T>> {
    fn detach(&self, id: u64) -> bool {
        self.lock().unwrap_or_else(|e| e.into_inner()).entries.remove(&id).is_some()
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the callback registered;
/// call [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes this registration. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.detach(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Set of callbacks interested in values of type `T`.
pub struct Listeners<T> {
    name: &'static str,
    registry: Arc<Mutex<Registry<T>>>,
    sink: Arc<dyn ErrorSink>,
}

impl<T: 'static> Listeners<T> {
    /// Creates an empty registry. `name` identifies it in failure reports.
    pub fn new(name: &'static str, sink: Arc<dyn ErrorSink>) -> Self {
        Listeners {
            name,
            registry: Arc::new(Mutex::new(Registry { next_id: 0, entries: BTreeMap::new() })),
            sink,
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.insert(id, Arc::new(callback));
        drop(registry);

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription { id, registry: weak }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.registry.lock().unwrap_or_else(|e| e.into_inner()).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes every callback with `value`.
    ///
    /// The registry lock is released before callbacks run, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    ///
    /// Panic isolation needs `panic = "unwind"`. Under `panic = "abort"`
    /// (this workspace's release profile) a panicking callback ends the process.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<(u64, Callback<T>)> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.entries.iter().map(|(id, cb)| (*id, Arc::clone(cb))).collect()
        };

        for (id, callback) in callbacks {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
                let message = panic_message(payload.as_ref());
                tracing::warn!(listener = id, "{} listener panicked: {}", self.name, message);
                self.sink.log_error(&ListenerPanic(message), self.name);
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "listeners_tests.rs"]
mod tests;
