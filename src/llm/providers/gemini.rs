use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::base::{GenerationParams, LlmMetadata, LlmProvider, LlmProviderError};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    error: Option<GeminiError>,
    #[serde(default)]
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}


pub struct GeminiProvider {
    api_key: String,
    model: String,
    endpoint: Url,
    client: Client,
}

impl GeminiProvider {

    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, LlmProviderError> {
        let model = model.into();
        let base = base_url.unwrap_or(GEMINI_BASE_URL);
        let endpoint = Url::parse(base)
            .and_then(|u| u.join(&format!("models/{model}:generateContent")))
            .map_err(|e| LlmProviderError::InvalidRequest(format!("bad base url {base}: {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;

        info!("Gemini provider initialized (model={}, endpoint={})", model, endpoint);
        Ok(Self {
            api_key: api_key.into(),
            model,
            endpoint,
            client,
        })
    }

    fn extract_text(&self, response: GeminiResponse) -> Result<(String, LlmMetadata), LlmProviderError> {
        if let Some(error) = response.error {
            return Err(LlmProviderError::Service {
                code: error.code,
                message: error.message,
            });
        }

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or(LlmProviderError::EmptyCandidates)?;

        let text: String = candidate
            .content
            .ok_or_else(|| LlmProviderError::MissingContent("candidate has no content".to_string()))?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LlmProviderError::MissingContent(format!(
                "empty text (finish_reason={})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let mut metadata = LlmMetadata {
            provider: "gemini".to_string(),
            model: self.model.clone(),
            base_url: Some(self.endpoint.to_string()),
            finish_reason: candidate.finish_reason,
            ..Default::default()
        };
        if let Some(usage) = response.usage_metadata {
            metadata.tokens_prompt = Some(usage.prompt_token_count);
            metadata.tokens_completion = Some(usage.candidates_token_count);
            metadata.tokens_total = Some(usage.total_token_count);
        }

        Ok((text, metadata))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: params.temperature,
                top_k: params.top_k,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Gemini API error: status={}, body={}", status, crate::safe_truncate(&body, 200));
            return Err(LlmProviderError::from_status(status.as_u16(), &body));
        }

        debug!("Gemini response received ({} bytes)", body.len());
        let parsed: GeminiResponse = serde_json::from_str(&body)?;
        self.extract_text(parsed)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
