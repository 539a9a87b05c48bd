pub mod file;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Person, PersonPatch};

pub use file::JsonFileStore;
pub use memory::MemoryStore;


#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Write rejected for {key}: {reason}")]
    Rejected { key: String, reason: String },

    #[error("Invalid person key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}


#[async_trait]
pub trait PersonStore: Send + Sync {

    async fn get(&self, key: &str) -> Result<Option<Person>, StoreError>;

    async fn upsert(&self, key: &str, patch: PersonPatch) -> Result<Person, StoreError>;

    async fn list_visible(&self, owner_id: &str) -> Result<Vec<Person>, StoreError>;
}


#[async_trait]
impl PersonStore for Arc<dyn PersonStore> {
    async fn get(&self, key: &str) -> Result<Option<Person>, StoreError> {
        (**self).get(key).await
    }

    async fn upsert(&self, key: &str, patch: PersonPatch) -> Result<Person, StoreError> {
        (**self).upsert(key, patch).await
    }

    async fn list_visible(&self, owner_id: &str) -> Result<Vec<Person>, StoreError> {
        (**self).list_visible(owner_id).await
    }
}

pub(crate) fn new_person_for(key: &str, patch: PersonPatch) -> Result<Person, StoreError> {
    let mut person = Person::from_key(key).ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
    person.apply(patch);
    Ok(person)
}
