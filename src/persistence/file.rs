//! JSON file backed store for native builds

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::NumberStore;

/// Stores all keys as one JSON object, rewritten on every set
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, f64>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`. Unreadable files start empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&json) {
                Ok(raw) => raw
                    .into_iter()
                    .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
                    .collect(),
                Err(e) => {
                    log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.values) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode store: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            log::warn!("Could not write store {}: {}", self.path.display(), e);
        }
    }
}

impl NumberStore for JsonFileStore {
    fn get_number(&self, key: &str, fallback: f64) -> f64 {
        self.values
            .get(key)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(fallback)
    }

    fn set_number(&mut self, key: &str, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lasso-panic-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);
        {
            let mut store = JsonFileStore::open(&path);
            store.set_number("lassoPanic.bestScore", 12.0);
        }
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get_number("lassoPanic.bestScore", 0.0), 12.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_reads_as_fallback() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ definitely not json").unwrap();
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get_number("lassoPanic.bestScore", 5.0), 5.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let dir = std::env::temp_dir().join(format!("lasso-panic-missing-{}", std::process::id()));
        let mut store = JsonFileStore::open(dir.join("nested").join("store.json"));
        store.set_number("k", 1.0);
        // In-memory value still readable even though the write failed
        assert_eq!(store.get_number("k", 0.0), 1.0);
    }
}
