//! Deprecation notices.
//!
//! Policy code reports upcoming behavior changes through a [`DeprecationSink`].
//! Each notice carries a key; a sink shows a given key at most once.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Receiver of one-time deprecation notices.
pub trait DeprecationSink: Send + Sync {
    /// Report `message` unless a notice with the same `key` was already shown.
    fn warn_once(&self, key: &str, message: &str);
}

/// Sink that emits each notice once as a `tracing` warning.
#[derive(Debug, Default)]
pub struct TracingDeprecations {
    seen: Mutex<HashSet<String>>,
}

impl TracingDeprecations {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeprecationSink for TracingDeprecations {
    fn warn_once(&self, key: &str, message: &str) {
        let first = self
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
        if first {
            tracing::warn!(target: "tzattr::deprecation", key, "{message}");
        }
    }
}

/// In-memory sink for tests: records every notice it would show.
#[derive(Debug, Default)]
pub struct MemoryDeprecations {
    notices: Mutex<Vec<(String, String)>>,
}

impl MemoryDeprecations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices shown so far, as `(key, message)` pairs in order.
    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeprecationSink for MemoryDeprecations {
    fn warn_once(&self, key: &str, message: &str) {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        if notices.iter().all(|(seen, _)| seen != key) {
            notices.push((key.to_string(), message.to_string()));
        }
    }
}
