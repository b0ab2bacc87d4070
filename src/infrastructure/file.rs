//! Document store persisted as a TOML snapshot

use crate::domain::Tag;
use crate::infrastructure::memory::Collection;
use crate::infrastructure::store::{DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

/// Document store that keeps every record in memory and writes the whole
/// collection to a TOML file after each mutation that changes it.
///
/// Mutations hold an exclusive advisory lock on `<snapshot>.lock`, re-read the
/// snapshot from disk, apply the change and write the result back before the
/// lock is released. Several handles (or processes) sharing one snapshot
/// therefore never overwrite each other's writes. The in-memory copy is
/// replaced only once the snapshot has been written, so a failed write leaves
/// both the file and this handle's state as they were.
///
/// Lookups read the in-memory copy, which reflects the snapshot as of this
/// handle's last mutation or [`FileStore::refresh`].
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    collection: RwLock<Collection>,
}

impl FileStore {
    /// Open a snapshot file, starting empty when it does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let collection = read_snapshot(&path).await?;

        debug!(path = %path.display(), records = collection.len(), "opened snapshot");

        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        Ok(FileStore {
            path,
            lock_path,
            collection: RwLock::new(collection),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the snapshot from disk, picking up writes made through other handles
    pub async fn refresh(&self) -> StoreResult<()> {
        let mut live = self.collection.write().await;
        *live = read_snapshot(&self.path).await?;
        trace!(path = %self.path.display(), records = live.len(), "snapshot refreshed");
        Ok(())
    }

    /// Run `apply` on the on-disk collection and persist it if it changed
    async fn mutate<F>(&self, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Collection) -> bool,
    {
        let mut live = self.collection.write().await;
        let lock = self.lock_snapshot().await?;

        let mut next = read_snapshot(&self.path).await?;
        if apply(&mut next) {
            if let Err(e) = self.write_snapshot(&next).await {
                warn!(path = %self.path.display(), error = %e, "snapshot write failed");
                return Err(e);
            }
        }

        *live = next;
        // Closing the handle releases the advisory lock
        drop(lock);
        Ok(())
    }

    /// Block until this process holds the exclusive lock beside the snapshot.
    async fn lock_snapshot(&self) -> StoreResult<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let lock_path = self.lock_path.clone();
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok(file)
        })
        .await
        .map_err(|e| StoreError::Other(e.into()))??;

        Ok(file)
    }

    /// Write to a fresh temp file beside the snapshot, then rename into place.
    /// The temp file is removed if any step fails.
    async fn write_snapshot(&self, collection: &Collection) -> StoreResult<()> {
        let contents = toml::to_string_pretty(collection).map_err(|e| {
            StoreError::Serialization(format!("Failed to serialize snapshot: {}", e))
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let target = self.path.clone();

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut temp_file = NamedTempFile::new_in(&dir)?;
            temp_file.write_all(contents.as_bytes())?;
            temp_file.flush()?;
            temp_file.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Other(e.into()))??;

        trace!(path = %self.path.display(), records = collection.len(), "snapshot written");
        Ok(())
    }
}

async fn read_snapshot(path: &Path) -> StoreResult<Collection> {
    match fs::read_to_string(path).await {
        Ok(contents) => toml::from_str(&contents).map_err(|e| {
            StoreError::Serialization(format!(
                "Failed to parse snapshot {}: {}",
                path.display(),
                e
            ))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collection::new()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn upsert_add_to_set(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        self.mutate(|c| c.upsert_add_to_set(id, field, value)).await
    }

    async fn remove_from_array(&self, id: &str, field: &str, value: &Tag) -> StoreResult<()> {
        self.mutate(|c| c.remove_from_array(id, field, value)).await
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
