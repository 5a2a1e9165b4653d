//! Once-per-day regeneration signal
//!
//! Remembers the last day for which series were handed out, so callers can
//! cheaply tell whether the day has rolled over since they last rendered.
//! The signal is advisory: generation is seeded, so regenerating twice on the
//! same day yields the same data anyway.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::Clock;

/// Key under which the marker is stored
pub const LAST_GENERATED_DAY_KEY: &str = "lastGeneratedDay";

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Marker store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Marker storage unavailable: {0}")]
    Unavailable(String),

    #[error("Marker storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Marker storage is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable string key-value slot
pub trait MarkerStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, forgotten on restart
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    entries: HashMap<String, String>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object file, e.g. `{"lastGeneratedDay":"2024-01-15"}`
///
/// The file may be shared: entries this store did not write are kept as-is,
/// whatever their type.
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    path: PathBuf,
}

impl FileMarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "Using file-backed marker store");
        Self { path }
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl MarkerStore for FileMarkerStore {
    /// A non-string value under `key` reads as absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.load()?.remove(key) {
            Some(Value::String(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        fs::write(&self.path, serde_json::to_string(&entries)?)?;
        Ok(())
    }
}

/// Stand-in for hosts without durable storage; every access fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableMarkerStore;

impl MarkerStore for UnavailableMarkerStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("no storage backend".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("no storage backend".to_string()))
    }
}

/// True when today differs from the stored marker; records today if so.
///
/// Storage failures count as "no marker", so a broken store reports true on
/// every call instead of failing the caller.
pub fn needs_regeneration(clock: &dyn Clock, store: &mut dyn MarkerStore) -> bool {
    let today = clock.today().format(DAY_FORMAT).to_string();

    let last = store.get(LAST_GENERATED_DAY_KEY).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read last generated day, treating as absent");
        None
    });

    if last.as_deref() == Some(today.as_str()) {
        return false;
    }

    if let Err(e) = store.set(LAST_GENERATED_DAY_KEY, &today) {
        warn!(error = %e, "Failed to record last generated day");
    }

    debug!(today = %today, previous = ?last, "Day rolled over, regeneration needed");
    true
}
