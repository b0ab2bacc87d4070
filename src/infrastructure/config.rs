//! Configuration management
//!
//! Convenience wiring only: a [`Tagger`](crate::Tagger) built by hand from any
//! store behaves the same as one built from a config.

use crate::error::{Result, TaggerError};
use crate::infrastructure::file::FileStore;
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Record field holding a key's tags unless configured otherwise
pub const DEFAULT_TAG_SET_FIELD: &str = "tagSet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Name of the array field that stores tags on each record
    pub tag_set_field: String,

    /// Snapshot file for a persistent store; in-memory when unset
    pub snapshot_path: Option<PathBuf>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            tag_set_field: DEFAULT_TAG_SET_FIELD.to_string(),
            snapshot_path: None,
        }
    }
}

impl TaggerConfig {
    /// Parse config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: TaggerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TaggerError::Config(format!("Config file not found: {}", path.display()))
            } else {
                TaggerError::Io(e)
            }
        })?;

        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.tag_set_field.is_empty() {
            return Err(TaggerError::Config(
                "tag_set_field must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the store this config describes
    pub async fn open_store(&self) -> Result<Arc<dyn DocumentStore>> {
        match &self.snapshot_path {
            Some(path) => Ok(Arc::new(FileStore::open(path.clone()).await?)),
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}
