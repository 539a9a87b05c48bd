use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::memory::{upsert_into, MemoryStore};
use super::{PersonStore, StoreError};
use crate::models::{Person, PersonPatch};

pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {

    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let people: Vec<Person> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        info!("JsonFileStore opened: path={}, people={}", path.display(), people.len());
        Ok(Self {
            path,
            inner: MemoryStore::with_people(people),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    async fn flush(&self, people: &[Person]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(people)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Flushed {} people to {}", people.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl PersonStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Person>, StoreError> {
        self.inner.get(key).await
    }

    async fn upsert(&self, key: &str, patch: PersonPatch) -> Result<Person, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut people = self.inner.snapshot();
        let person = upsert_into(&mut people, key, patch)?;
        self.flush(&people).await?;
        self.inner.replace(people);
        Ok(person)
    }

    async fn list_visible(&self, owner_id: &str) -> Result<Vec<Person>, StoreError> {
        self.inner.list_visible(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store
            .upsert(
                "twitter:erin",
                PersonPatch {
                    owner_id: Some("me".to_string()),
                    quotes: Some(vec!["shipping a new compiler pass".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let erin = reopened.get("twitter:erin").await.unwrap().unwrap();
        assert_eq!(erin.quotes.len(), 1);
        assert_eq!(reopened.list_visible("me").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_flush_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let store = JsonFileStore::open(sub.join("people.json")).await.unwrap();
        store
            .upsert("twitter:amy", PersonPatch::quotes(vec!["kept".to_string()]))
            .await
            .unwrap();
        std::fs::remove_dir_all(&sub).unwrap();

        let created = store
            .upsert("twitter:zed", PersonPatch::quotes(vec!["x".to_string()]))
            .await;
        assert!(matches!(created, Err(StoreError::Io(_))));
        assert!(store.get("twitter:zed").await.unwrap().is_none());

        let updated = store
            .upsert("twitter:amy", PersonPatch::quotes(vec!["lost".to_string()]))
            .await;
        assert!(updated.is_err());
        assert_eq!(store.get("twitter:amy").await.unwrap().unwrap().quotes, vec!["kept"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json")).await.unwrap();
        assert!(store.get("twitter:nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Serialization(_))
        ));
    }
}
