use tracing::{debug, info, warn};

use super::fallback::fallback_profile;
use super::models::EnrichedProfile;
use super::prompt::build_enrichment_prompt;
use super::schema::ProfileFields;
use crate::collector::RawContent;
use crate::llm::{parse_json_object, Gateway, GenerationParams};
use crate::models::{Person, Provenance};


pub struct EnrichmentEngine {

    gateway: Gateway,
    sample_size: usize,
}

impl EnrichmentEngine {

    pub fn new(gateway: Gateway, sample_size: usize) -> Self {
        let sample_size = sample_size.max(1);
        info!("EnrichmentEngine initialized: sample_size={}", sample_size);
        Self { gateway, sample_size }
    }

    pub async fn enrich(&self, person: &Person, content: &RawContent) -> EnrichedProfile {
        let mut profile = fallback_profile(person, content);

        if !content.provenance.is_evidence() {
            info!(
                "Skipping model call for {}: content came from {} strategy, using fallback profile",
                person.key, content.provenance
            );
            return profile;
        }

        let sample = &content.snippets[..content.len().min(self.sample_size)];
        let prompt = build_enrichment_prompt(person, sample);
        debug!("Enriching {} with {} of {} snippets", person.key, sample.len(), content.len());

        let response = match self.gateway.generate(&prompt, &GenerationParams::narrative()).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Enrichment call failed for {} ({}): {}, using fallback profile", person.key, e.kind(), e);
                return profile;
            }
        };

        let object = match parse_json_object(&response) {
            Ok(object) => object,
            Err(e) => {
                warn!("Enrichment response for {} unparseable: {}", person.key, e);
                warn!("Response was: {}", crate::safe_truncate(&response, 200));
                return profile;
            }
        };

        let fields = ProfileFields::from_object(&object);
        let rejected = fields.rejected();
        merge(&mut profile, fields);

        if rejected.is_empty() {
            info!("Enriched {} entirely from model output", person.key);
        } else {
            warn!(
                "Enriched {} with fallback for {} field(s): {}",
                person.key,
                rejected.len(),
                rejected.join(", ")
            );
        }
        profile
    }
}

fn merge(profile: &mut EnrichedProfile, fields: ProfileFields) {
    let sources = &mut profile.sources;

    if let Some(v) = fields.overview {
        profile.overview = v;
        sources.overview = Provenance::Ai;
    }
    if let Some(v) = fields.expertise {
        profile.expertise = v;
        sources.expertise = Provenance::Ai;
    }
    if let Some(v) = fields.achievements {
        profile.achievements = v;
        sources.achievements = Provenance::Ai;
    }
    if let Some(v) = fields.interests {
        profile.interests = v;
        sources.interests = Provenance::Ai;
    }
    if let Some(v) = fields.personality_traits {
        profile.personality_traits = v;
        sources.personality_traits = Provenance::Ai;
    }
    if let Some(v) = fields.communication_style {
        profile.communication_style = v;
        sources.communication_style = Provenance::Ai;
    }
    if let Some(v) = fields.connection_message {
        profile.connection_message = v;
        sources.connection_message = Provenance::Ai;
    }
    if let Some(v) = fields.timeline.filter(|t| !t.is_empty()) {
        profile.timeline = v;
        sources.timeline = Provenance::Ai;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ContentProvenance;
    use crate::enrichment::FieldSources;
    use crate::llm::RetryPolicy;
    use crate::models::Platform;
    use crate::testing::ScriptedProvider;
    use std::sync::Arc;
    use std::time::Duration;

    const FULL_RESPONSE: &str = r#"```json
{
  "overview": "Ada builds AI tooling for early-stage startups.",
  "expertise": ["Machine Learning", "Startups", "Python"],
  "achievements": ["Founded an AI startup", "Shipped an open-source model"],
  "interests": ["LLMs", "Fundraising"],
  "personality_traits": ["Curious", "Driven"],
  "communication_style": "Short, upbeat updates.",
  "connection_message": "Hi Ada, loved your post about the startup!",
  "timeline": [
    {"type": "post", "action": "Announced", "content": "the AI startup", "relative_time": "1 day ago"}
  ],
}
```"#;

    fn engine(provider: Arc<ScriptedProvider>, sample_size: usize) -> EnrichmentEngine {
        EnrichmentEngine::new(
            Gateway::new(provider, RetryPolicy::new(2, Duration::ZERO)),
            sample_size,
        )
    }

    fn person() -> Person {
        let mut person = Person::new(Platform::Twitter, "ada", "me");
        person.display_name = "Ada".to_string();
        person
    }

    fn scraped(snippets: &[&str]) -> RawContent {
        RawContent::new(
            snippets.iter().map(|s| s.to_string()).collect(),
            ContentProvenance::Scrape,
            "scrape:profile",
        )
    }

    #[tokio::test]
    async fn test_full_model_profile() {
        let provider = Arc::new(ScriptedProvider::new().reply(FULL_RESPONSE));
        let profile = engine(provider.clone(), 25)
            .enrich(&person(), &scraped(&["we're building an AI startup"]))
            .await;

        assert!(profile.is_complete());
        assert_eq!(profile.sources, FieldSources::uniform(Provenance::Ai));
        assert_eq!(profile.expertise[0], "Machine Learning");
        assert_eq!(profile.timeline.len(), 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_model_profile_mixes_sources() {
        let partial = r#"{"overview": "Ada writes about AI.", "expertise": ["AI"], "interests": "startups"}"#;
        let provider = Arc::new(ScriptedProvider::new().reply(partial));
        let profile = engine(provider, 25)
            .enrich(&person(), &scraped(&["we're building an AI startup"]))
            .await;

        assert!(profile.is_complete());
        assert!(profile.sources.is_mixed());
        assert_eq!(profile.overview, "Ada writes about AI.");
        assert_eq!(profile.sources.overview, Provenance::Ai);
        assert_eq!(profile.sources.expertise, Provenance::Heuristic);
        assert_eq!(profile.sources.interests, Provenance::Heuristic);
        assert!(profile.expertise.len() >= 3);
    }

    #[tokio::test]
    async fn test_gateway_failure_yields_fallback() {
        let provider = Arc::new(ScriptedProvider::new().fail_status(503).fail_status(503));
        let profile = engine(provider.clone(), 25)
            .enrich(&person(), &scraped(&["research on neural networks"]))
            .await;

        assert!(profile.is_complete());
        assert_eq!(profile.sources, FieldSources::default());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_response_yields_fallback() {
        let provider = Arc::new(ScriptedProvider::new().reply("Sorry, I can't help with that."));
        let profile = engine(provider, 25)
            .enrich(&person(), &scraped(&["hello"]))
            .await;
        assert!(profile.is_complete());
        assert_eq!(profile.sources.ai_count(), 0);
    }

    #[tokio::test]
    async fn test_stub_content_skips_model() {
        let provider = Arc::new(ScriptedProvider::new().reply(FULL_RESPONSE));
        let content = RawContent::new(vec!["Based in Lisbon".to_string()], ContentProvenance::Stub, "stub");
        let profile = engine(provider.clone(), 25).enrich(&person(), &content).await;

        assert!(profile.is_complete());
        assert_eq!(provider.calls(), 0);
        assert_eq!(profile.content_provenance, ContentProvenance::Stub);
    }

    #[tokio::test]
    async fn test_prompt_sample_is_bounded() {
        let provider = Arc::new(ScriptedProvider::new().reply(FULL_RESPONSE));
        let snippets: Vec<String> = (1..=40).map(|i| format!("post number {i}")).collect();
        let content = RawContent::new(snippets, ContentProvenance::Stored, "stored");
        engine(provider.clone(), 15).enrich(&person(), &content).await;

        let prompts = provider.prompts();
        let prompt = &prompts[0];
        assert!(prompt.contains("post number 15"));
        assert!(!prompt.contains("post number 16"));
    }
}
