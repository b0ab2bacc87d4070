//! In-memory document store

use crate::domain::{matching_keys, Tag, TagQuery};
use crate::infrastructure::store::{DocumentStore, StoreResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::trace;

/// One stored record: an id plus named array fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<Tag>>,
}

/// Synchronous record map implementing the document store primitives.
///
/// Records are kept ordered by id, so lookups return ids in ascending order.
/// Mutations report whether anything changed, which lets persistent stores
/// skip rewriting unchanged snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    documents: BTreeMap<String, Document>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn upsert_add_to_set(&mut self, id: &str, field: &str, value: &Tag) -> bool {
        let created = !self.documents.contains_key(id);
        let array = self
            .documents
            .entry(id.to_string())
            .or_default()
            .fields
            .entry(field.to_string())
            .or_default();

        if array.contains(value) {
            return created;
        }
        array.push(value.clone());
        true
    }

    pub fn remove_from_array(&mut self, id: &str, field: &str, value: &Tag) -> bool {
        let Some(array) = self
            .documents
            .get_mut(id)
            .and_then(|doc| doc.fields.get_mut(field))
        else {
            return false;
        };

        let before = array.len();
        array.retain(|element| element != value);
        array.len() != before
    }

    pub fn find_by_exact_array_element(&self, field: &str, value: &Tag) -> Vec<String> {
        self.find(field, &TagQuery::Exact(value.clone()))
    }

    /// Truncating an element to `prefix_length` components and comparing it
    /// with `prefix_value` reduces to three cases: a parent match when the
    /// lengths agree, an exact match when `prefix_length` is longer than the
    /// value, and no match at all when it is shorter.
    pub fn find_by_array_element_prefix(
        &self,
        field: &str,
        prefix_length: usize,
        prefix_value: &Tag,
    ) -> Vec<String> {
        use std::cmp::Ordering;

        match prefix_length.cmp(&prefix_value.len()) {
            Ordering::Equal => self.find(field, &TagQuery::Parent(prefix_value.clone())),
            Ordering::Greater => self.find(field, &TagQuery::Exact(prefix_value.clone())),
            Ordering::Less => Vec::new(),
        }
    }

    pub fn find_array(&self, id: &str, field: &str) -> Option<Vec<Tag>> {
        self.documents
            .get(id)
            .map(|doc| doc.fields.get(field).cloned().unwrap_or_default())
    }

    fn find(&self, field: &str, query: &TagQuery) -> Vec<String> {
        let records = self.documents.iter().map(|(id, doc)| {
            let tags = doc.fields.get(field).map(Vec::as_slice).unwrap_or(&[]);
            (id.as_str(), tags.iter())
        });
        matching_keys(records, query)
    }
}

/// Document store living entirely in process memory.
///
/// Each primitive holds the lock for its whole duration, so every call is
/// atomic with respect to the others.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, including records whose tags were all removed
    pub async fn len(&self) -> usize {
        self.collection.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.collection.read().await.is_empty()
    }
}

impl From<Collection> for MemoryStore {
    fn from(collection: Collection) -> Self {
        MemoryStore {
            collection: RwLock::new(collection),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert_add_to_set(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        let changed = self
            .collection
            .write()
            .await
            .upsert_add_to_set(id, field, value);
        trace!(id, field, tag = %value, changed, "upsert_add_to_set");
        Ok(())
    }

    async fn remove_from_array(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        let changed = self
            .collection
            .write()
            .await
            .remove_from_array(id, field, value);
        trace!(id, field, tag = %value, changed, "remove_from_array");
        Ok(())
    }

    async fn find_by_exact_array_element(
        &self,
        field: &str,
        value: &Tag,
    ) -> StoreResult<Vec<String>> {
        Ok(self
            .collection
            .read()
            .await
            .find_by_exact_array_element(field, value))
    }

    async fn find_by_array_element_prefix(
        &self,
        field: &str,
        prefix_length: usize,
        prefix_value: &Tag,
    ) -> StoreResult<Vec<String>> {
        Ok(self
            .collection
            .read()
            .await
            .find_by_array_element_prefix(field, prefix_length, prefix_value))
    }

    async fn find_array(&self, id: &str, field: &str) -> StoreResult<Option<Vec<Tag>>> {
        Ok(self.collection.read().await.find_array(id, field))
    }
}
