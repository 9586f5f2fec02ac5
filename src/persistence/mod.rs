//! Best-effort numeric key/value persistence
//!
//! Stores only ever hold a couple of numbers (best score, best time). Every
//! backend swallows its own failures: reads fall back, writes are dropped.

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Numeric key/value store
pub trait NumberStore {
    /// Stored value for `key`, or `fallback` if missing, unreadable or non-finite
    fn get_number(&self, key: &str, fallback: f64) -> f64;

    /// Store `value` under `key` (failures are ignored)
    fn set_number(&mut self, key: &str, value: f64);
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with values
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

impl NumberStore for MemoryStore {
    fn get_number(&self, key: &str, fallback: f64) -> f64 {
        self.values
            .get(key)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(fallback)
    }

    fn set_number(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Parse a stored textual number, rejecting non-finite values
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
