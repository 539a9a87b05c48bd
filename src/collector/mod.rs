pub mod scrape;
pub mod stored;
pub mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, IntoStaticStr};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::config::RolodexConfig;
use crate::core::error::ErrorKind;
use crate::models::{parse_person_key, Platform};
use crate::store::PersonStore;

pub use scrape::{ScrapeCommand, ScrapeStrategy, ScrapeVariant};
pub use stored::StoredContentStrategy;
pub use stub::StubStrategy;


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentProvenance {
    Scrape,
    Stored,
    Stub,
}

impl ContentProvenance {
    pub fn is_evidence(self) -> bool {
        !matches!(self, Self::Stub)
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContent {
    pub snippets: Vec<String>,
    pub provenance: ContentProvenance,
    pub strategy: String,
    pub strategy_index: usize,
}

impl RawContent {
    pub fn new(snippets: Vec<String>, provenance: ContentProvenance, strategy: impl Into<String>) -> Self {
        Self {
            snippets,
            provenance,
            strategy: strategy.into(),
            strategy_index: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }
}


#[derive(Debug, Clone)]
pub struct CollectTarget {
    pub key: String,
    pub platform: Platform,
    pub handle: String,
}

impl CollectTarget {
    pub fn parse(key: &str) -> Result<Self, CollectError> {
        let (platform, handle) =
            parse_person_key(key).ok_or_else(|| CollectError::InvalidKey(key.to_string()))?;
        Ok(Self {
            key: crate::models::person_key(platform, &handle),
            platform,
            handle,
        })
    }
}


#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("permanent failure: {0}")]
    Permanent(String),
}


#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Invalid person key: {0}")]
    InvalidKey(String),

    #[error("No content found for {key} after {attempted} strategies")]
    NoContent { key: String, attempted: usize },

    #[error("Strategy {strategy} failed permanently: {message}")]
    Permanent { strategy: String, message: String },
}

impl CollectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKey(_) => ErrorKind::Validation,
            Self::NoContent { .. } => ErrorKind::NoContent,
            Self::Permanent { .. } => ErrorKind::Configuration,
        }
    }
}


#[async_trait]
pub trait CollectStrategy: Send + Sync {

    fn name(&self) -> &str;


    fn provenance(&self) -> ContentProvenance;

    async fn attempt(&self, target: &CollectTarget) -> Result<Vec<String>, StrategyError>;
}


pub struct Collector {
    strategies: Vec<Box<dyn CollectStrategy>>,
}

impl Collector {
    pub fn new(strategies: Vec<Box<dyn CollectStrategy>>) -> Self {
        info!(
            "Collector initialized: strategies=[{}]",
            strategies.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        );
        Self { strategies }
    }

    pub fn from_config(config: &RolodexConfig, store: Arc<dyn PersonStore>) -> Self {
        let mut strategies: Vec<Box<dyn CollectStrategy>> = ScrapeCommand::defaults(&config.scrape_program)
            .into_iter()
            .map(|command| Box::new(ScrapeStrategy::from_config(command, config)) as Box<dyn CollectStrategy>)
            .collect();
        strategies.push(Box::new(StoredContentStrategy::new(store.clone())));
        if config.stub_enabled {
            strategies.push(Box::new(StubStrategy::new(store)));
        }
        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }


    pub async fn collect(&self, key: &str) -> Result<RawContent, CollectError> {
        let target = CollectTarget::parse(key)?;
        debug!("Collecting content for {}", target.key);

        for (index, strategy) in self.strategies.iter().enumerate() {
            match strategy.attempt(&target).await {
                Ok(snippets) => {
                    let snippets: Vec<String> = snippets
                        .into_iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    if snippets.is_empty() {
                        debug!("Strategy {} yielded nothing for {}", strategy.name(), target.key);
                        continue;
                    }
                    info!(
                        "Collected {} snippets for {} via {} (strategy {}/{})",
                        snippets.len(),
                        target.key,
                        strategy.name(),
                        index + 1,
                        self.strategies.len()
                    );
                    return Ok(RawContent {
                        snippets,
                        provenance: strategy.provenance(),
                        strategy: strategy.name().to_string(),
                        strategy_index: index + 1,
                    });
                }
                Err(StrategyError::Transient(message)) => {
                    warn!(
                        "Strategy {} failed for {} ({}), trying next",
                        strategy.name(),
                        target.key,
                        message
                    );
                }
                Err(StrategyError::Permanent(message)) => {
                    warn!("Strategy {} failed permanently for {}: {}", strategy.name(), target.key, message);
                    return Err(CollectError::Permanent {
                        strategy: strategy.name().to_string(),
                        message,
                    });
                }
            }
        }

        Err(CollectError::NoContent {
            key: target.key,
            attempted: self.strategies.len(),
        })
    }
}
