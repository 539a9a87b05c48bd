use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{new_person_for, PersonStore, StoreError};
use crate::models::{Person, PersonPatch};

#[derive(Default)]
pub struct MemoryStore {
    people: RwLock<Vec<Person>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_people(people: impl IntoIterator<Item = Person>) -> Self {
        Self {
            people: RwLock::new(people.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.people.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Person> {
        self.people.read().clone()
    }

    pub(crate) fn replace(&self, people: Vec<Person>) {
        *self.people.write() = people;
    }
}

pub(crate) fn upsert_into(people: &mut Vec<Person>, key: &str, patch: PersonPatch) -> Result<Person, StoreError> {
    if let Some(existing) = people.iter_mut().find(|p| p.key == key) {
        existing.apply(patch);
        debug!("Updated person {}", key);
        return Ok(existing.clone());
    }

    let person = new_person_for(key, patch)?;
    debug!("Created person {}", key);
    people.push(person.clone());
    Ok(person)
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Person>, StoreError> {
        Ok(self.people.read().iter().find(|p| p.key == key).cloned())
    }

    async fn upsert(&self, key: &str, patch: PersonPatch) -> Result<Person, StoreError> {
        upsert_into(&mut self.people.write(), key, patch)
    }

    async fn list_visible(&self, owner_id: &str) -> Result<Vec<Person>, StoreError> {
        Ok(self
            .people
            .read()
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
