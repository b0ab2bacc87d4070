//! Document store abstraction
//!
//! The tagger only needs four primitives from whatever persists key records:
//! an atomic upsert-and-add-to-set, an array pull, exact element lookup, and
//! element prefix lookup. Everything else about the backend (layout, indexes,
//! transport) stays behind this trait.

use crate::domain::Tag;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for document store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures reported by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Backend holding records of the form `{ id, <field>: [Tag, ...] }`.
///
/// Every method is a single request and must be atomic on its own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the record if absent, then append `value` to `field` unless an
    /// equal element is already present.
    async fn upsert_add_to_set(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()>;

    /// Remove every element of `field` equal to `value`. Missing records and
    /// missing elements are not errors.
    async fn remove_from_array(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()>;

    /// Ids of records whose `field` contains an element equal to `value`
    async fn find_by_exact_array_element(&self, field: &str, value: &Tag)
        -> StoreResult<Vec<String>>;

    /// Distinct ids of records whose `field` contains an element whose first
    /// `prefix_length` components equal `prefix_value`
    async fn find_by_array_element_prefix(
        &self,
        field: &str,
        prefix_length: usize,
        prefix_value: &Tag,
    ) -> StoreResult<Vec<String>>;

    /// Contents of `field` for one record, or `None` when the record does not
    /// exist. A record without the field yields an empty vector.
    async fn find_array(&self, id: &str, field: &str) -> StoreResult<Option<Vec<Tag>>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn upsert_add_to_set(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        (**self).upsert_add_to_set(id, field, value).await
    }

    async fn remove_from_array(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        (**self).remove_from_array(id, field, value).await
    }

    async fn find_by_exact_array_element(
        &self,
        field: &str,
        value: &Tag,
    ) -> StoreResult<Vec<String>> {
        (**self).find_by_exact_array_element(field, value).await
    }

    async fn find_by_array_element_prefix(
        &self,
        field: &str,
        prefix_length: usize,
        prefix_value: &Tag,
    ) -> StoreResult<Vec<String>> {
        (**self)
            .find_by_array_element_prefix(field, prefix_length, prefix_value)
            .await
    }

    async fn find_array(&self, id: &str, field: &str) -> StoreResult<Option<Vec<Tag>>> {
        (**self).find_array(id, field).await
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    async fn upsert_add_to_set(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        (**self).upsert_add_to_set(id, field, value).await
    }

    async fn remove_from_array(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        (**self).remove_from_array(id, field, value).await
    }

    async fn find_by_exact_array_element(
        &self,
        field: &str,
        value: &Tag,
    ) -> StoreResult<Vec<String>> {
        (**self).find_by_exact_array_element(field, value).await
    }

    async fn find_by_array_element_prefix(
        &self,
        field: &str,
        prefix_length: usize,
        prefix_value: &Tag,
    ) -> StoreResult<Vec<String>> {
        (**self)
            .find_by_array_element_prefix(field, prefix_length, prefix_value)
            .await
    }

    async fn find_array(&self, id: &str, field: &str) -> StoreResult<Option<Vec<Tag>>> {
        (**self).find_array(id, field).await
    }
}
