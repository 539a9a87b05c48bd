use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{CollectStrategy, CollectTarget, ContentProvenance, StrategyError};
use crate::store::PersonStore;

pub struct StubStrategy {
    store: Arc<dyn PersonStore>,
}

impl StubStrategy {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CollectStrategy for StubStrategy {
    fn name(&self) -> &str {
        "stub"
    }

    fn provenance(&self) -> ContentProvenance {
        ContentProvenance::Stub
    }

    async fn attempt(&self, target: &CollectTarget) -> Result<Vec<String>, StrategyError> {
        let person = self
            .store
            .get(&target.key)
            .await
            .map_err(|e| StrategyError::Transient(e.to_string()))?;

        let Some(person) = person else {
            return Ok(Vec::new());
        };

        let mut snippets = Vec::new();
        if let Some(bio) = person.bio() {
            snippets.push(bio.to_string());
        }
        if let Some(location) = person
            .details
            .as_ref()
            .and_then(|d| d.location.as_deref())
            .filter(|l| !l.trim().is_empty())
        {
            snippets.push(format!("Based in {location}"));
        }

        debug!("Stub content for {}: {} snippets", target.key, snippets.len());
        Ok(snippets)
    }
}
