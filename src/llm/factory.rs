use std::sync::Arc;
use std::time::Duration;

use super::providers::base::LlmProvider;
use super::providers::gemini::GeminiProvider;
use super::providers::ollama::OllamaProvider;
use crate::core::config::RolodexConfig;
use crate::core::error::{Result, RolodexError};
use crate::DEFAULT_OLLAMA_URL;


pub struct ProviderFactory;

impl ProviderFactory {

    pub fn create(
        provider: &str,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Arc<dyn LlmProvider>> {
        let map_err = |e: super::LlmProviderError| RolodexError::Config(e.to_string());
        match provider {
            "gemini" => {
                let api_key = api_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| RolodexError::Config("gemini requires llm_api_key".to_string()))?;
                Ok(Arc::new(
                    GeminiProvider::new(api_key, model, base_url, timeout).map_err(map_err)?,
                ))
            }
            "ollama" => Ok(Arc::new(
                OllamaProvider::new(base_url.unwrap_or(DEFAULT_OLLAMA_URL), model, timeout)
                    .map_err(map_err)?,
            )),
            other => Err(RolodexError::Config(format!(
                "Unknown provider: {other}. Supported: gemini, ollama"
            ))),
        }
    }


    pub fn from_config(config: &RolodexConfig) -> Result<Arc<dyn LlmProvider>> {
        Self::create(
            &config.llm_provider,
            &config.llm_model,
            config.llm_api_key.as_deref(),
            config.llm_base_url.as_deref(),
            Duration::from_secs(config.llm_timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_provider() {
        let provider =
            ProviderFactory::create("ollama", "llama3.2", None, None, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "llama3.2");
    }

    #[test]
    fn test_create_gemini_provider() {
        let provider = ProviderFactory::create(
            "gemini",
            "gemini-1.5-flash",
            Some("test-key"),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.provider_name(), "gemini");
    }

    #[test]
    fn test_gemini_without_key_is_config_error() {
        let err = ProviderFactory::create("gemini", "m", None, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_unknown_provider_is_error() {
        let err = ProviderFactory::create("unknown", "model", None, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown provider"));
    }
}
