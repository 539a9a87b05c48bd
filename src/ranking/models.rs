use serde::{Deserialize, Serialize};

use crate::models::{Person, Provenance};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub person: Person,
    pub score: f64,
    pub raw_score: f64,
    pub provenance: Provenance,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub candidates: Vec<RankedCandidate>,
    pub keywords: Vec<String>,
    pub explanation: String,
    pub no_strong_connections: bool,
    pub strong_matches: usize,
    pub provenance: Provenance,
}

impl SearchResult {
    pub fn no_strong(
        query: &str,
        keywords: Vec<String>,
        explanation: String,
        strong_matches: usize,
        provenance: Provenance,
    ) -> Self {
        Self {
            query: query.to_string(),
            candidates: Vec::new(),
            keywords,
            explanation,
            no_strong_connections: true,
            strong_matches,
            provenance,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.no_strong_connections == self.candidates.is_empty()
    }
}
