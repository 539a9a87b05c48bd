use std::cmp::Ordering;

use super::config::RankingConfig;
use crate::models::Person;
use crate::topics::Topic;
use crate::utils::{contains_term, normalize_terms};


#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeuristicScore {
    pub total: f64,
    pub exact_terms: Vec<String>,
    pub ai_terms: Vec<&'static str>,
    pub engineering_terms: Vec<&'static str>,
    pub business_terms: Vec<&'static str>,
    pub volume_units: usize,
    pub active_relationship: bool,
}

impl HeuristicScore {
    pub fn explanation(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.exact_terms.is_empty() {
            parts.push(format!("mentions {}", self.exact_terms.join(", ")));
        }
        for (label, terms) in [
            ("AI/ML", &self.ai_terms),
            ("engineering", &self.engineering_terms),
            ("business", &self.business_terms),
        ] {
            if !terms.is_empty() {
                parts.push(format!("{} topics ({})", label, terms.join(", ")));
            }
        }
        if self.total > 0.0 && self.volume_units > 0 {
            parts.push("posts regularly".to_string());
        }
        if self.total > 0.0 && self.active_relationship {
            parts.push("active connection".to_string());
        }

        if parts.is_empty() {
            "No overlap with the query in their posts".to_string()
        } else {
            let mut text = parts.join("; ");
            if let Some(first) = text.get(..1) {
                text = first.to_uppercase() + &text[1..];
            }
            text
        }
    }
}


fn matching(normalized: &str, terms: &'static [&'static str]) -> Vec<&'static str> {
    terms.iter().copied().filter(|t| contains_term(normalized, t)).collect()
}


pub fn score_person(config: &RankingConfig, keywords: &[String], person: &Person) -> HeuristicScore {
    let normalized = normalize_terms(&person.quotes.join(" "));

    let exact_terms: Vec<String> = keywords
        .iter()
        .filter(|k| contains_term(&normalized, k))
        .cloned()
        .collect();
    let ai_terms = matching(&normalized, Topic::AiMl.content_terms());
    let engineering_terms = matching(&normalized, Topic::Engineering.content_terms());
    let business_terms = matching(&normalized, Topic::Business.content_terms());

    let base = exact_terms.len() as f64 * config.exact_match_weight
        + ai_terms.len() as f64 * config.ai_term_weight
        + engineering_terms.len() as f64 * config.engineering_term_weight
        + business_terms.len() as f64 * config.business_term_weight;

    let volume_units = (person.quotes.len() / config.volume_unit_snippets.max(1)).min(config.volume_cap_units);
    let active_relationship = person.relationship.is_active();

    let mut total = base;
    if base > 0.0 {
        total += volume_units as f64 * config.volume_weight;
        if active_relationship {
            total += config.relationship_weight;
        }
    }

    HeuristicScore {
        total,
        exact_terms,
        ai_terms,
        engineering_terms,
        business_terms,
        volume_units,
        active_relationship,
    }
}

pub fn rank_people(config: &RankingConfig, keywords: &[String], people: &[Person]) -> Vec<(usize, HeuristicScore)> {
    let mut scored: Vec<(usize, HeuristicScore)> = people
        .iter()
        .enumerate()
        .map(|(i, p)| (i, score_person(config, keywords, p)))
        .collect();

    scored.sort_by(|a, b| b.1.total.partial_cmp(&a.1.total).unwrap_or(Ordering::Equal));
    scored
}
