//! Tagging use cases
//!
//! [`Tagger`] is a stateless façade over a [`DocumentStore`]. Each operation
//! normalizes its tag argument first (parsing strings, passing structured tags
//! through untouched) and then issues exactly one store request.

use crate::domain::{KeyRecord, TagInput, TagSet};
use crate::error::Result;
use crate::infrastructure::{DocumentStore, TaggerConfig, DEFAULT_TAG_SET_FIELD};
use std::sync::Arc;
use tracing::debug;

/// Tags keys with hierarchical tags and looks keys up by tag.
///
/// # Examples
///
/// ```
/// use tagpath::application::Tagger;
/// use tagpath::infrastructure::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let tagger = Tagger::new(MemoryStore::new());
/// tagger.tag_key("key17", "tag_level1/tag_level2/tag_level3").await.unwrap();
///
/// let keys = tagger.keys_by_parent_tag("tag_level1/tag_level2").await.unwrap();
/// assert_eq!(keys, vec!["key17"]);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Tagger<S> {
    store: S,
    field: String,
}

impl<S: DocumentStore> Tagger<S> {
    /// Create a tagger storing tags in the default `tagSet` field
    pub fn new(store: S) -> Self {
        Self::with_field(store, DEFAULT_TAG_SET_FIELD)
    }

    /// Create a tagger storing tags in a custom record field
    pub fn with_field(store: S, field: impl Into<String>) -> Self {
        Tagger {
            store,
            field: field.into(),
        }
    }

    /// The underlying store, e.g. to refresh or inspect a `FileStore`
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Attach a tag to a key, creating the key's record if needed.
    /// Tagging a key twice with the same tag leaves a single copy.
    pub async fn tag_key(&self, key: &str, tag: impl Into<TagInput>) -> Result<()> {
        let tag = tag.into().normalize()?;
        debug!(key, tag = %tag, "tag key");
        self.store.upsert_add_to_set(key, &self.field, &tag).await?;
        Ok(())
    }

    /// Detach a tag from a key. Unknown keys and tags are ignored.
    pub async fn untag_key(&self, key: &str, tag: impl Into<TagInput>) -> Result<()> {
        let tag = tag.into().normalize()?;
        debug!(key, tag = %tag, "untag key");
        self.store.remove_from_array(key, &self.field, &tag).await?;
        Ok(())
    }

    /// Keys carrying exactly this tag
    pub async fn keys_by_tag(&self, tag: impl Into<TagInput>) -> Result<Vec<String>> {
        let tag = tag.into().normalize()?;
        let keys = self
            .store
            .find_by_exact_array_element(&self.field, &tag)
            .await?;
        debug!(tag = %tag, found = keys.len(), "keys by tag");
        Ok(keys)
    }

    /// Keys carrying at least one tag that starts with `parent_tag`, the tag
    /// itself included. Each key is returned once.
    pub async fn keys_by_parent_tag(
        &self,
        parent_tag: impl Into<TagInput>,
    ) -> Result<Vec<String>> {
        let parent_tag = parent_tag.into().normalize()?;
        let keys = self
            .store
            .find_by_array_element_prefix(&self.field, parent_tag.len(), &parent_tag)
            .await?;
        debug!(parent_tag = %parent_tag, found = keys.len(), "keys by parent tag");
        Ok(keys)
    }

    /// The stored record for a key, or `None` if the key was never tagged.
    /// A key whose tags were all removed still has a record.
    pub async fn key_record(&self, key: &str) -> Result<Option<KeyRecord>> {
        let tags = self.store.find_array(key, &self.field).await?;
        Ok(tags.map(|tags| KeyRecord::new(key.to_string(), TagSet::from(tags))))
    }

    /// Tags currently attached to a key, or `None` if the key was never tagged
    pub async fn tags_of_key(&self, key: &str) -> Result<Option<TagSet>> {
        Ok(self.key_record(key).await?.map(|record| record.tag_set))
    }
}

impl Tagger<Arc<dyn DocumentStore>> {
    /// Build a tagger and its store from configuration
    pub async fn from_config(config: &TaggerConfig) -> Result<Self> {
        let store = config.open_store().await?;
        Ok(Self::with_field(store, config.tag_set_field.clone()))
    }
}
