use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schema::{ACHIEVEMENTS, EXPERTISE, INTERESTS, PERSONALITY_TRAITS};
use crate::collector::ContentProvenance;
use crate::models::{Provenance, TimelineKind};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub action: String,
    pub content: String,
    pub relative_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSources {
    pub overview: Provenance,
    pub expertise: Provenance,
    pub achievements: Provenance,
    pub interests: Provenance,
    pub personality_traits: Provenance,
    pub communication_style: Provenance,
    pub connection_message: Provenance,
    pub timeline: Provenance,
}

impl FieldSources {
    pub fn uniform(provenance: Provenance) -> Self {
        Self {
            overview: provenance,
            expertise: provenance,
            achievements: provenance,
            interests: provenance,
            personality_traits: provenance,
            communication_style: provenance,
            connection_message: provenance,
            timeline: provenance,
        }
    }

    fn all(&self) -> [Provenance; 8] {
        [
            self.overview,
            self.expertise,
            self.achievements,
            self.interests,
            self.personality_traits,
            self.communication_style,
            self.connection_message,
            self.timeline,
        ]
    }

    pub fn ai_count(&self) -> usize {
        self.all().iter().filter(|p| **p == Provenance::Ai).count()
    }

    pub fn is_mixed(&self) -> bool {
        let ai = self.ai_count();
        ai > 0 && ai < self.all().len()
    }
}

impl Default for FieldSources {
    fn default() -> Self {
        Self::uniform(Provenance::Heuristic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProfile {
    pub overview: String,
    pub expertise: Vec<String>,
    pub achievements: Vec<String>,
    pub interests: Vec<String>,
    pub personality_traits: Vec<String>,
    pub communication_style: String,
    pub connection_message: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub sources: FieldSources,
    pub content_provenance: ContentProvenance,
    pub generated_at: DateTime<Utc>,
}

impl EnrichedProfile {
    pub fn is_complete(&self) -> bool {
        let text_ok = [&self.overview, &self.communication_style, &self.connection_message]
            .iter()
            .all(|s| !s.trim().is_empty());

        let lists_ok = [
            (&self.expertise, EXPERTISE),
            (&self.achievements, ACHIEVEMENTS),
            (&self.interests, INTERESTS),
            (&self.personality_traits, PERSONALITY_TRAITS),
        ]
        .iter()
        .all(|(items, bounds)| {
            bounds.contains(items.len()) && items.iter().all(|i| !i.trim().is_empty())
        });

        text_ok && lists_ok
    }
}
