use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::RankingConfig;
use super::heuristic::{rank_people, HeuristicScore};
use super::models::{RankedCandidate, SearchResult};
use super::prompt::build_ranking_prompt;
use crate::core::error::ErrorKind;
use crate::enrichment::schema::text_field;
use crate::llm::{parse_json_object, Gateway, GatewayError, GenerationParams, ParseError};
use crate::models::{Person, Provenance};
use crate::topics::{classify_query, Topic};
use crate::utils::query_keywords;

const MIN_MODEL_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Ranking response has no usable candidates array")]
    MissingCandidates,

    #[error("Ranking response scored none of the {0} candidates sent")]
    NoKnownCandidates(usize),
}

impl RankingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Gateway(e) => e.kind(),
            Self::Parse(_) => ErrorKind::MalformedResponse,
            Self::MissingCandidates | Self::NoKnownCandidates(_) => ErrorKind::Validation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ModelRanking {
    scored: Vec<(usize, f64, String)>,
    keywords: Option<Vec<String>>,
    explanation: Option<String>,
}

struct Scored {
    entries: Vec<(usize, f64, String)>,
    keywords: Vec<String>,
    explanation: String,
    provenance: Provenance,
    threshold: f64,
}


pub struct RankingEngine {

    gateway: Gateway,

    config: RankingConfig,
}

impl RankingEngine {

    pub fn new(gateway: Gateway, config: RankingConfig) -> Self {
        let config = RankingConfig {
            max_results: config.max_results.max(1),
            ..config
        };
        info!(
            "RankingEngine initialized: ai_threshold={}, heuristic_threshold={}, min_strong={}, max_results={}",
            config.ai_strong_threshold,
            config.heuristic_strong_threshold,
            config.min_strong_matches,
            config.max_results
        );
        Self { gateway, config }
    }

    pub async fn rank(&self, query: &str, people: &[Person]) -> SearchResult {
        let topic = classify_query(query);
        let keywords = query_keywords(query);
        debug!(
            "Ranking {} candidates for '{}' (topic={}, keywords={:?})",
            people.len(),
            crate::safe_truncate(query, 80),
            topic,
            keywords
        );

        if people.is_empty() {
            return self.no_strong(query, topic, 0, labels(topic), Provenance::Heuristic);
        }

        let heuristic = rank_people(&self.config, &keywords, people);

        let scored = match self.rank_with_model(query, people, &heuristic).await {
            Ok(model) => self.model_scores(model, topic),
            Err(e) => {
                warn!("Model ranking failed ({}): {}, falling back to heuristic scores", e.kind(), e);
                self.heuristic_scores(query, heuristic, topic)
            }
        };

        self.apply_threshold(query, people, topic, scored)
    }

    async fn rank_with_model(
        &self,
        query: &str,
        people: &[Person],
        heuristic: &[(usize, HeuristicScore)],
    ) -> Result<ModelRanking, RankingError> {
        let mut indices: Vec<usize> = if people.len() > self.config.max_ai_candidates {
            info!(
                "Pre-selecting {} of {} candidates for model ranking",
                self.config.max_ai_candidates,
                people.len()
            );
            heuristic
                .iter()
                .take(self.config.max_ai_candidates)
                .map(|(i, _)| *i)
                .collect()
        } else {
            (0..people.len()).collect()
        };
        indices.sort_unstable();

        let sent: Vec<&Person> = indices.iter().map(|&i| &people[i]).collect();
        let prompt = build_ranking_prompt(query, &sent, self.config.ai_sample_size);

        let response = self.gateway.generate(&prompt, &GenerationParams::structured()).await?;
        let object = parse_json_object(&response).inspect_err(|_| {
            warn!("Response was: {}", crate::safe_truncate(&response, 200));
        })?;

        let by_key: HashMap<&str, usize> = indices.iter().map(|&i| (people[i].key.as_str(), i)).collect();
        validate_model_ranking(&object, &by_key)
    }

    fn model_scores(&self, model: ModelRanking, topic: Topic) -> Scored {
        let keywords = model.keywords.unwrap_or_else(|| {
            debug!("Model keywords invalid, using {} labels", topic);
            labels(topic)
        });
        let explanation = model.explanation.unwrap_or_else(|| {
            format!("Ranked {} connections by relevance to your search.", model.scored.len())
        });
        Scored {
            entries: model.scored,
            keywords,
            explanation,
            provenance: Provenance::Ai,
            threshold: self.config.ai_strong_threshold,
        }
    }

    fn heuristic_scores(&self, query: &str, heuristic: Vec<(usize, HeuristicScore)>, topic: Topic) -> Scored {
        let matched = heuristic.iter().filter(|(_, s)| s.total > 0.0).count();
        Scored {
            entries: heuristic
                .into_iter()
                .map(|(i, s)| {
                    let explanation = s.explanation();
                    (i, s.total, explanation)
                })
                .collect(),
            keywords: labels(topic),
            explanation: format!(
                "Ranked connections by keyword and topic overlap with \"{}\"; {} had relevant posts.",
                query, matched
            ),
            provenance: Provenance::Heuristic,
            threshold: self.config.heuristic_strong_threshold,
        }
    }

    fn apply_threshold(&self, query: &str, people: &[Person], topic: Topic, scored: Scored) -> SearchResult {
        let mut entries = scored.entries;
        entries.sort_by_key(|(i, _, _)| *i);
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let strong = entries.iter().filter(|(_, score, _)| *score >= scored.threshold).count();
        if strong < self.config.min_strong_matches {
            info!(
                "Only {} strong matches for '{}' via {} path (need {})",
                strong,
                crate::safe_truncate(query, 80),
                scored.provenance,
                self.config.min_strong_matches
            );
            return self.no_strong(query, topic, strong, scored.keywords, scored.provenance);
        }

        entries.truncate(self.config.max_results);
        let candidates: Vec<RankedCandidate> = entries
            .into_iter()
            .map(|(i, raw, explanation)| RankedCandidate {
                person: people[i].clone(),
                score: raw.clamp(0.0, MAX_SCORE),
                raw_score: raw,
                provenance: scored.provenance,
                explanation,
            })
            .collect();

        info!(
            "Ranked '{}': {} candidates, {} strong, provenance={}",
            crate::safe_truncate(query, 80),
            candidates.len(),
            strong,
            scored.provenance
        );

        SearchResult {
            query: query.to_string(),
            candidates,
            keywords: scored.keywords,
            explanation: scored.explanation,
            no_strong_connections: false,
            strong_matches: strong,
            provenance: scored.provenance,
        }
    }

    fn no_strong(
        &self,
        query: &str,
        topic: Topic,
        strong: usize,
        keywords: Vec<String>,
        provenance: Provenance,
    ) -> SearchResult {
        let explanation = format!(
            "No strong connections found for \"{}\": {} of the {} needed matches. {}",
            query,
            strong,
            self.config.min_strong_matches,
            topic.suggestion()
        );
        SearchResult::no_strong(query, keywords, explanation, strong, provenance)
    }
}

fn labels(topic: Topic) -> Vec<String> {
    topic.labels().iter().map(|l| l.to_string()).collect()
}

fn validate_model_ranking(
    object: &Map<String, Value>,
    by_key: &HashMap<&str, usize>,
) -> Result<ModelRanking, RankingError> {
    let items = object
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or(RankingError::MissingCandidates)?;

    let mut scored: Vec<(usize, f64, String)> = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        let index = item
            .get("id")
            .and_then(id_text)
            .and_then(|id| by_key.get(id.as_str()).copied());
        let score = item.get("score").and_then(score_value);

        match (index, score) {
            (Some(index), Some(score)) if !scored.iter().any(|(i, _, _)| *i == index) => {
                let explanation = text_field(item.get("explanation"))
                    .unwrap_or_else(|| "Relevant to your search".to_string());
                scored.push((index, score, explanation));
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!("Dropped {} ranking entries with unknown ids or invalid scores", dropped);
    }
    if scored.is_empty() {
        return Err(RankingError::NoKnownCandidates(by_key.len()));
    }

    let keywords = object.get("keywords").and_then(Value::as_array).and_then(|k| {
        let words: Vec<String> = k.iter().filter_map(|w| text_field(Some(w))).collect();
        (words.len() == 3 && k.len() == 3).then_some(words)
    });

    Ok(ModelRanking {
        scored,
        keywords,
        explanation: text_field(object.get("explanation")),
    })
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_lowercase()),
        _ => None,
    }
}

fn score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score
        .is_finite()
        .then(|| score.round().clamp(MIN_MODEL_SCORE, MAX_SCORE))
}
