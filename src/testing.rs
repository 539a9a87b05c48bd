use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::collector::{CollectStrategy, CollectTarget, Collector, ContentProvenance, StrategyError};
use crate::enrichment::EnrichmentEngine;
use crate::llm::{Gateway, GenerationParams, LlmMetadata, LlmProvider, LlmProviderError, RetryPolicy};
use crate::models::{Person, PersonPatch};
use crate::pipeline::Pipeline;
use crate::ranking::{RankingConfig, RankingEngine};
use crate::store::{MemoryStore, PersonStore, StoreError};

pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, LlmProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(text.into()));
        self
    }

    pub fn fail_status(self, status: u16) -> Self {
        self.fail_with(LlmProviderError::from_status(status, "scripted failure"))
    }

    pub fn fail_with(self, error: LlmProviderError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        self.prompts.lock().push(prompt.to_string());
        let next = self.script.lock().pop_front();
        let text = next.unwrap_or_else(|| Err(LlmProviderError::from_status(503, "script exhausted")))?;
        Ok((
            text,
            LlmMetadata {
                provider: "scripted".to_string(),
                model: "scripted-model".to_string(),
                ..Default::default()
            },
        ))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}


enum Outcome {
    Snippets(Vec<String>),
    Transient,
    Permanent,
}

pub struct FixedStrategy {
    name: String,
    outcome: Outcome,
}

impl FixedStrategy {
    pub fn empty(name: &str) -> Self {
        Self::snippets(name, &[])
    }

    pub fn snippets(name: &str, snippets: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Snippets(snippets.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn transient(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Transient,
        }
    }

    pub fn permanent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Permanent,
        }
    }
}

#[async_trait]
impl CollectStrategy for FixedStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn provenance(&self) -> ContentProvenance {
        ContentProvenance::Scrape
    }

    async fn attempt(&self, _target: &CollectTarget) -> Result<Vec<String>, StrategyError> {
        match &self.outcome {
            Outcome::Snippets(snippets) => Ok(snippets.clone()),
            Outcome::Transient => Err(StrategyError::Transient(format!("{} timed out", self.name))),
            Outcome::Permanent => Err(StrategyError::Permanent(format!("{} is misconfigured", self.name))),
        }
    }
}

pub struct FailingStore {
    inner: MemoryStore,
    unavailable: bool,
    rejected_keys: Vec<String>,
}

impl FailingStore {
    pub fn unavailable() -> Self {
        Self {
            inner: MemoryStore::new(),
            unavailable: true,
            rejected_keys: Vec::new(),
        }
    }

    pub fn rejecting(keys: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            unavailable: false,
            rejected_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn check_up(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersonStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<Person>, StoreError> {
        self.check_up()?;
        self.inner.get(key).await
    }

    async fn upsert(&self, key: &str, patch: PersonPatch) -> Result<Person, StoreError> {
        self.check_up()?;
        if self.rejected_keys.iter().any(|k| k == key) {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "constraint violation".to_string(),
            });
        }
        self.inner.upsert(key, patch).await
    }

    async fn list_visible(&self, owner_id: &str) -> Result<Vec<Person>, StoreError> {
        self.check_up()?;
        self.inner.list_visible(owner_id).await
    }
}

pub fn offline_pipeline(strategies: Vec<Box<dyn CollectStrategy>>, store: Arc<dyn PersonStore>) -> Pipeline {
    let gateway = Gateway::new(Arc::new(ScriptedProvider::new()), RetryPolicy::new(1, Duration::ZERO));
    Pipeline::new(
        Collector::new(strategies),
        EnrichmentEngine::new(gateway.clone(), 25),
        RankingEngine::new(gateway, RankingConfig::default()),
        store,
        Duration::ZERO,
    )
}
