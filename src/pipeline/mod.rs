pub mod batch;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collector::{CollectError, CollectTarget, Collector, ContentProvenance};
use crate::core::config::RolodexConfig;
use crate::core::error::{ErrorKind, Result};
use crate::enrichment::{EnrichedProfile, EnrichmentEngine};
use crate::llm::{Gateway, ProviderFactory};
use crate::models::{Person, PersonPatch};
use crate::ranking::{RankingEngine, SearchResult};
use crate::store::{JsonFileStore, PersonStore, StoreError};

pub use models::{BatchFailure, BatchReport};


#[derive(Error, Debug)]
pub enum EnrichError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("Persisting {key} failed: {source}")]
    Persistence {
        key: String,
        #[source]
        source: StoreError,
    },
}

impl EnrichError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Collect(e) => e.kind(),
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    fn persistence(key: &str) -> impl FnOnce(StoreError) -> Self + '_ {
        move |source| Self::Persistence {
            key: key.to_string(),
            source,
        }
    }
}


pub struct Pipeline {
    collector: Collector,
    enricher: EnrichmentEngine,
    ranker: RankingEngine,
    store: Arc<dyn PersonStore>,
    batch_delay: Duration,
}

impl Pipeline {

    pub fn new(
        collector: Collector,
        enricher: EnrichmentEngine,
        ranker: RankingEngine,
        store: Arc<dyn PersonStore>,
        batch_delay: Duration,
    ) -> Self {
        info!("Pipeline initialized: batch_delay={:?}", batch_delay);
        Self {
            collector,
            enricher,
            ranker,
            store,
            batch_delay,
        }
    }

    pub async fn from_config(config: &RolodexConfig) -> Result<Self> {
        config.validate()?;

        let store: Arc<dyn PersonStore> = Arc::new(JsonFileStore::open(&config.store_path).await?);
        let gateway = Gateway::new(ProviderFactory::from_config(config)?, config.retry_policy());

        Ok(Self::new(
            Collector::from_config(config, store.clone()),
            EnrichmentEngine::new(gateway.clone(), config.enrichment_sample_size),
            RankingEngine::new(gateway, config.ranking.clone()),
            store,
            config.batch_delay(),
        ))
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub async fn person(&self, key: &str) -> std::result::Result<Option<Person>, EnrichError> {
        let key = CollectTarget::parse(key)?.key;
        self.store.get(&key).await.map_err(EnrichError::persistence(&key))
    }

    pub async fn collect_and_enrich(&self, key: &str) -> std::result::Result<EnrichedProfile, EnrichError> {
        let key = CollectTarget::parse(key)?.key;
        let content = self.collector.collect(&key).await?;

        let person = if content.provenance == ContentProvenance::Scrape {
            self.store
                .upsert(&key, PersonPatch::quotes(content.snippets.clone()))
                .await
                .map_err(EnrichError::persistence(&key))?
        } else {
            debug!("Not persisting {} content for {}", content.provenance, key);
            let stored = self
                .store
                .get(&key)
                .await
                .map_err(EnrichError::persistence(&key))?;
            match stored.or_else(|| Person::from_key(&key)) {
                Some(person) => person,
                None => return Err(CollectError::InvalidKey(key).into()),
            }
        };

        let profile = self.enricher.enrich(&person, &content).await;

        self.store
            .upsert(&key, PersonPatch::profile(profile.clone()))
            .await
            .map_err(EnrichError::persistence(&key))?;

        info!(
            "Enriched {}: {} snippets via {}, {} model fields",
            key,
            content.len(),
            content.strategy,
            profile.sources.ai_count()
        );
        Ok(profile)
    }

    pub async fn search(&self, query: &str, owner_id: &str) -> SearchResult {
        let people = match self.store.list_visible(owner_id).await {
            Ok(people) => people,
            Err(e) => {
                warn!("Listing connections for {} failed: {}, searching an empty set", owner_id, e);
                Vec::new()
            }
        };
        debug!("Searching {} connections of {}", people.len(), owner_id);
        self.ranker.rank(query, &people).await
    }
}
