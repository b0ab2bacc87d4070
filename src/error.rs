//! Error types for tagpath

use crate::domain::TagParseError;
use crate::infrastructure::StoreError;
use thiserror::Error;

/// Main error type for tagpath
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Invalid tag: {0}")]
    Parse(#[from] TagParseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaggerError {
    /// True when the input tag was rejected before reaching the store
    pub fn is_parse_error(&self) -> bool {
        matches!(self, TaggerError::Parse(_))
    }

    /// True when the document store reported the failure
    pub fn is_store_error(&self) -> bool {
        matches!(self, TaggerError::Store(_))
    }
}

/// Result type using TaggerError
pub type Result<T> = std::result::Result<T, TaggerError>;
