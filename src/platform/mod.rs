//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, a JSON file natively)
//! - Audio (Web Audio on web, silent natively)
//! - Seeding
//! - The browser entry object

use crate::audio::AudioSink;
use crate::persistence::NumberStore;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

/// Records file used natively unless `LASSO_PANIC_RECORDS` overrides it
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_RECORDS_FILE: &str = "lasso-panic-records.json";

/// Native records file location
#[cfg(not(target_arch = "wasm32"))]
pub fn records_path() -> std::path::PathBuf {
    std::env::var_os("LASSO_PANIC_RECORDS")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| DEFAULT_RECORDS_FILE.into())
}

/// Persistent store for the current target
pub fn default_store() -> Box<dyn NumberStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(crate::persistence::LocalStorageStore::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(crate::persistence::JsonFileStore::open(records_path()))
    }
}

/// Audio sink for the current target
pub fn default_audio() -> Box<dyn AudioSink> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(crate::audio::WebAudio::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(crate::audio::SilentAudio::new())
    }
}

/// Fresh session seed
pub fn random_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        rand::random()
    }
}
