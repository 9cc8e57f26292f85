//! Stored user preferences (key → string), read once at startup.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Key of the "audio mode enabled" preference; the stored value `"true"` turns
/// on video blocking.
pub const AUDIO_MODE_KEY: &str = "enableAudioMode";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference store I/O ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preference store {} has unexpected shape: {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
}

/// In-process store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.read().unwrap().get(key).cloned())
    }
}

/// JSON object of string values on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.local/state/audiotap/preferences.json`.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("audiotap")?;
        Ok(xdg_dirs.get_state_home().join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| PreferenceError::Shape {
            path: self.path.clone(),
            source,
        })
    }

    /// Stores `value` under `key`, creating the file and its directory if needed.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value.to_string());

        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(&values).map_err(|source| PreferenceError::Shape {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, json).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all().await?.remove(key))
    }
}
