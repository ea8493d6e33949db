//! Durable local player profile
//!
//! An opaque key-value store holds the device's high score, its generated
//! id and the saved player identity, each as a small JSON value under its
//! own key. Malformed stored data is treated as absence: defaults win, a
//! warning is logged, session startup never fails because of it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

pub const HIGH_SCORE_KEY: &str = "high_score";
pub const DEVICE_ID_KEY: &str = "device_id";
pub const PLAYER_IDENTITY_KEY: &str = "player_identity";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] io::Error),
    #[error("invalid key {0:?} (must be a plain name, not a path)")]
    InvalidKey(String),
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Opaque local persistence, string key to JSON string value
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        Ok(())
    }
}

/// Name and handle offered back on later submits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub name: String,
    pub telegram_handle: String,
}

/// Stored high score, defaulting to zero on absence or corruption
pub fn load_high_score(store: &dyn KeyValueStore) -> u32 {
    load_json(store, HIGH_SCORE_KEY).unwrap_or(0)
}

pub fn save_high_score(store: &mut dyn KeyValueStore, high_score: u32) -> Result<(), StorageError> {
    save_json(store, HIGH_SCORE_KEY, &high_score)
}

/// The device id, generated once and reused thereafter
pub fn load_or_create_device_id(store: &mut dyn KeyValueStore) -> Result<String, StorageError> {
    if let Some(id) = load_json::<String>(store, DEVICE_ID_KEY) {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    save_json(store, DEVICE_ID_KEY, &id)?;
    log::info!("generated device id {id}");
    Ok(id)
}

pub fn load_player_identity(store: &dyn KeyValueStore) -> Option<PlayerIdentity> {
    load_json(store, PLAYER_IDENTITY_KEY)
}

pub fn save_player_identity(
    store: &mut dyn KeyValueStore,
    identity: &PlayerIdentity,
) -> Result<(), StorageError> {
    save_json(store, PLAYER_IDENTITY_KEY, identity)
}

fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("could not read {key}: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("corrupt value under {key}, falling back to default: {e}");
            None
        }
    }
}

fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
