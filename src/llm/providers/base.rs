use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::utils::safe_truncate_ellipsis;


#[derive(Error, Debug)]
pub enum LlmProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Service error ({code:?}): {message}")]
    Service { code: Option<u16>, message: String },

    #[error("Response contained no candidates")]
    EmptyCandidates,

    #[error("Response is missing content: {0}")]
    MissingContent(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmProviderError {
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: safe_truncate_ellipsis(body, 300),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| is_transient_status(s.as_u16()))
            }
            Self::Status { status, .. } => is_transient_status(*status),
            Self::Service { code, .. } => code.is_some_and(is_transient_status),
            Self::EmptyCandidates
            | Self::MissingContent(_)
            | Self::Json(_)
            | Self::InvalidRequest(_) => false,
        }
    }
}


pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 408 | 429) || (500..600).contains(&status)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub const fn structured() -> Self {
        Self {
            temperature: 0.3,
            top_k: 20,
            top_p: 0.8,
            max_output_tokens: 2048,
        }
    }

    pub const fn narrative() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::structured()
    }
}


#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmMetadata {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_prompt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_completion: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<(String, LlmMetadata), LlmProviderError>;


    fn provider_name(&self) -> &str;


    fn model_name(&self) -> &str;
}


#[async_trait]
impl LlmProvider for Arc<dyn LlmProvider> {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        (**self).generate(prompt, params).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
