//! Browser LocalStorage backed store

use super::{NumberStore, parse_number};

/// Reads and writes numbers as strings in `window.localStorage`
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl NumberStore for LocalStorageStore {
    fn get_number(&self, key: &str, fallback: f64) -> f64 {
        Self::storage()
            .and_then(|s| s.get_item(key).ok().flatten())
            .and_then(|raw| parse_number(&raw))
            .unwrap_or(fallback)
    }

    fn set_number(&mut self, key: &str, value: f64) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if storage.set_item(key, &value.to_string()).is_err() {
            log::warn!("LocalStorage write for {} failed", key);
        }
    }
}
