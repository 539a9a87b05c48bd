use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RolodexError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub ai_strong_threshold: f64,
    pub heuristic_strong_threshold: f64,
    pub min_strong_matches: usize,
    pub max_results: usize,

    pub exact_match_weight: f64,
    pub ai_term_weight: f64,
    pub engineering_term_weight: f64,
    pub business_term_weight: f64,
    pub volume_weight: f64,
    pub volume_unit_snippets: usize,
    pub volume_cap_units: usize,
    pub relationship_weight: f64,

    pub max_ai_candidates: usize,
    pub ai_sample_size: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            ai_strong_threshold: 7.0,
            heuristic_strong_threshold: 5.0,
            min_strong_matches: 3,
            max_results: 10,
            exact_match_weight: 10.0,
            ai_term_weight: 5.0,
            engineering_term_weight: 5.0,
            business_term_weight: 3.0,
            volume_weight: 2.0,
            volume_unit_snippets: 5,
            volume_cap_units: 3,
            relationship_weight: 3.0,
            max_ai_candidates: 40,
            ai_sample_size: 5,
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(RolodexError::Config("ranking.max_results must be at least 1".to_string()));
        }
        if self.volume_unit_snippets == 0 {
            return Err(RolodexError::Config(
                "ranking.volume_unit_snippets must be at least 1".to_string(),
            ));
        }
        if self.max_ai_candidates == 0 {
            return Err(RolodexError::Config(
                "ranking.max_ai_candidates must be at least 1".to_string(),
            ));
        }
        let weights = [
            ("ai_strong_threshold", self.ai_strong_threshold),
            ("heuristic_strong_threshold", self.heuristic_strong_threshold),
            ("exact_match_weight", self.exact_match_weight),
            ("ai_term_weight", self.ai_term_weight),
            ("engineering_term_weight", self.engineering_term_weight),
            ("business_term_weight", self.business_term_weight),
            ("volume_weight", self.volume_weight),
            ("relationship_weight", self.relationship_weight),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(RolodexError::Config(format!(
                "ranking.{name} must be a non-negative number, got {value}"
            )));
        }
        Ok(())
    }
}
