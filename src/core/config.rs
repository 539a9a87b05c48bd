use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::Result;
use crate::llm::retry::RetryPolicy;
use crate::ranking::RankingConfig;


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RolodexConfig {

    pub llm_provider: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub llm_retry_delay_ms: u64,


    pub scrape_program: String,
    pub scrape_timeout_secs: u64,
    pub scrape_max_output_bytes: usize,
    pub scrape_max_results: usize,
    pub scrape_window_days: i64,
    pub stub_enabled: bool,


    pub enrichment_sample_size: usize,
    pub batch_delay_ms: u64,


    pub store_path: PathBuf,

    pub ranking: RankingConfig,
}

impl Default for RolodexConfig {
    fn default() -> Self {
        Self {
            llm_provider: "gemini".to_string(),
            llm_model: crate::DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: None,
            llm_base_url: None,
            llm_timeout_secs: 60,
            llm_max_attempts: 3,
            llm_retry_delay_ms: 1500,

            scrape_program: crate::DEFAULT_SCRAPE_PROGRAM.to_string(),
            scrape_timeout_secs: 30,
            scrape_max_output_bytes: 1024 * 1024,
            scrape_max_results: 40,
            scrape_window_days: 30,
            stub_enabled: true,

            enrichment_sample_size: 25,
            batch_delay_ms: 2000,

            store_path: PathBuf::from("rolodex.json"),

            ranking: RankingConfig::default(),
        }
    }
}

impl RolodexConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!("Loading config file: {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("ROLODEX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        config.validate()?;
        Ok(config)
    }


    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm_max_attempts == 0 {
            return Err(crate::RolodexError::Config(
                "llm_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.scrape_max_output_bytes == 0 {
            return Err(crate::RolodexError::Config(
                "scrape_max_output_bytes must be positive".to_string(),
            ));
        }
        self.ranking.validate()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.llm_max_attempts,
            Duration::from_millis(self.llm_retry_delay_ms),
        )
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }
}
