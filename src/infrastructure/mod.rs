//! Infrastructure layer - Document stores and configuration

pub mod config;
pub mod file;
pub mod memory;
pub mod store;

pub use config::{TaggerConfig, DEFAULT_TAG_SET_FIELD};
pub use file::FileStore;
pub use memory::{Collection, Document, MemoryStore};
pub use store::{DocumentStore, StoreError, StoreResult};
