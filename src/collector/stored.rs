use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{CollectStrategy, CollectTarget, ContentProvenance, StrategyError};
use crate::store::PersonStore;

pub struct StoredContentStrategy {
    store: Arc<dyn PersonStore>,
}

impl StoredContentStrategy {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CollectStrategy for StoredContentStrategy {
    fn name(&self) -> &str {
        "stored"
    }

    fn provenance(&self) -> ContentProvenance {
        ContentProvenance::Stored
    }

    async fn attempt(&self, target: &CollectTarget) -> Result<Vec<String>, StrategyError> {
        let person = self
            .store
            .get(&target.key)
            .await
            .map_err(|e| StrategyError::Transient(e.to_string()))?;

        let quotes = person.map(|p| p.quotes).unwrap_or_default();
        debug!("Stored content for {}: {} quotes", target.key, quotes.len());
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonPatch;
    use crate::store::MemoryStore;
    use crate::testing::FailingStore;

    #[tokio::test]
    async fn test_returns_stored_quotes() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert("twitter:bob", PersonPatch::quotes(vec!["a".into(), "b".into()]))
            .await
            .unwrap();
        let strategy = StoredContentStrategy::new(store);
        let target = CollectTarget::parse("twitter:bob").unwrap();
        assert_eq!(strategy.attempt(&target).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unknown_person_is_empty() {
        let strategy = StoredContentStrategy::new(Arc::new(MemoryStore::new()));
        let target = CollectTarget::parse("twitter:ghost").unwrap();
        assert!(strategy.attempt(&target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_transient() {
        let strategy = StoredContentStrategy::new(Arc::new(FailingStore::unavailable()));
        let target = CollectTarget::parse("twitter:bob").unwrap();
        assert!(matches!(
            strategy.attempt(&target).await,
            Err(StrategyError::Transient(_))
        ));
    }
}
