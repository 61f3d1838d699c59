//! Search history persisted in a key/value store.
//!
//! The store keeps an in-memory mirror that is authoritative for the
//! session. Every change is written back as a JSON array of strings under
//! [`HISTORY_KEY`]. Reading never fails: a missing or unreadable value
//! starts an empty history.

use std::{
    collections::HashMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tracing::{debug, warn};

/// Namespaced key the history list is stored under.
pub const HISTORY_KEY: &str = "weather-search.history";

/// Maximum number of remembered places.
pub const HISTORY_LIMIT: usize = 8;

/// Durable string storage addressed by key.
pub trait HistoryStorage: Send + Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl HistoryStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read history file");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.lock().insert(key.to_string(), value.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds valid strings.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HistoryStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Most-recent-first list of searched places.
#[derive(Debug)]
pub struct HistoryStore {
    entries: Vec<String>,
    storage: Box<dyn HistoryStorage>,
}

impl HistoryStore {
    /// Load history from `storage`. Absent or malformed data yields an empty list.
    pub fn load(storage: impl HistoryStorage + 'static) -> Self {
        let entries = match storage.get(HISTORY_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => normalize(list),
                Err(err) => {
                    warn!(error = %err, "discarding malformed search history");
                    Vec::new()
                }
            },
        };
        debug!(count = entries.len(), "loaded search history");

        Self { entries, storage: Box::new(storage) }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `place` to the front, dropping any case-insensitive duplicate.
    pub fn record(&mut self, place: &str) {
        let place = place.trim();
        if place.is_empty() {
            return;
        }

        let key = place.to_lowercase();
        self.entries.retain(|entry| entry.to_lowercase() != key);
        self.entries.insert(0, place.to_string());
        self.entries.truncate(HISTORY_LIMIT);
        self.persist();
    }

    /// Remove the entry stored exactly as `place`.
    pub fn remove(&mut self, place: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != place);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Entries starting with `prefix`, ignoring case, in stored order.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to encode search history");
                return;
            }
        };
        if let Err(err) = self.storage.set(HISTORY_KEY, &raw) {
            warn!(error = %err, "failed to persist search history");
        }
    }
}

fn normalize(list: Vec<String>) -> Vec<String> {
    let mut entries: Vec<String> = Vec::with_capacity(HISTORY_LIMIT);
    for entry in list {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let key = entry.to_lowercase();
        if entries.iter().any(|e| e.to_lowercase() == key) {
            continue;
        }
        entries.push(entry.to_string());
        if entries.len() == HISTORY_LIMIT {
            break;
        }
    }
    entries
}
