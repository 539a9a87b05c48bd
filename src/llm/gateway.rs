use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::providers::base::{GenerationParams, LlmProvider, LlmProviderError};
use super::retry::{retry_with_policy, RetryFailure, RetryPolicy};
use crate::core::error::ErrorKind;


#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Text generation failed permanently after {attempts} attempt(s): {source}")]
    Permanent {
        attempts: u32,
        #[source]
        source: LlmProviderError,
    },

    #[error("Text generation exhausted {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: LlmProviderError,
    },
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyPrompt => ErrorKind::Validation,
            Self::Exhausted { .. } => ErrorKind::TransientService,
            Self::Permanent { source, .. } => match source {
                LlmProviderError::EmptyCandidates
                | LlmProviderError::MissingContent(_)
                | LlmProviderError::Json(_) => ErrorKind::MalformedResponse,
                _ => ErrorKind::TransientService,
            },
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::EmptyPrompt => 0,
            Self::Permanent { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

#[derive(Clone)]
pub struct Gateway {
    provider: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl Gateway {

    pub fn new(provider: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        info!(
            "Gateway initialized: provider={}, model={}, max_attempts={}, delay={:?}",
            provider.provider_name(),
            provider.model_name(),
            policy.max_attempts,
            policy.delay
        );
        Self { provider, policy }
    }


    pub async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, GatewayError> {
        self.generate_with_attempts(prompt, params, self.policy.max_attempts)
            .await
    }


    pub async fn generate_with_attempts(
        &self,
        prompt: &str,
        params: &GenerationParams,
        max_attempts: u32,
    ) -> Result<String, GatewayError> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::EmptyPrompt);
        }

        let policy = self.policy.with_max_attempts(max_attempts);
        let label = format!("generate[{}]", self.provider.provider_name());
        let provider = &self.provider;

        debug!(
            "Calling {} (prompt_chars={}, temperature={})",
            provider.model_name(),
            prompt.chars().count(),
            params.temperature
        );

        let outcome = retry_with_policy(&policy, &label, LlmProviderError::is_retryable, |_| {
            provider.generate(prompt, params)
        })
        .await;

        match outcome {
            Ok((text, metadata)) => {
                debug!(
                    "Generation complete: tokens_total={:?}, finish_reason={:?}",
                    metadata.tokens_total, metadata.finish_reason
                );
                Ok(text)
            }
            Err(RetryFailure::Permanent { attempts, error }) => Err(GatewayError::Permanent {
                attempts,
                source: error,
            }),
            Err(RetryFailure::Exhausted { attempts, error }) => Err(GatewayError::Exhausted {
                attempts,
                source: error,
            }),
        }
    }
}
