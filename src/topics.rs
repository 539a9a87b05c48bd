use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, IntoStaticStr};

use crate::utils::{contains_term, normalize_terms};


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    AiMl,
    Engineering,
    Business,
    Research,
    Design,
    General,
}

pub const TOPIC_ORDER: [Topic; 6] = [
    Topic::AiMl,
    Topic::Engineering,
    Topic::Business,
    Topic::Research,
    Topic::Design,
    Topic::General,
];


#[derive(Debug, Clone)]
pub struct TopicProfile {
    pub query_triggers: Vec<&'static str>,
    pub content_terms: Vec<&'static str>,
    pub labels: [&'static str; 3],
    pub suggestion: &'static str,
    pub expertise_areas: Vec<&'static str>,
    pub interests: Vec<&'static str>,
}

lazy_static! {
    pub static ref TOPICS: HashMap<Topic, TopicProfile> = {
        let mut m = HashMap::new();
        m.insert(Topic::AiMl, TopicProfile {
            query_triggers: vec![
                "ai", "ml", "machine learning", "artificial intelligence", "llm", "llms",
                "gpt", "deep learning", "neural", "nlp", "data science",
            ],
            content_terms: vec![
                "ai", "artificial intelligence", "machine learning", "ml", "deep learning",
                "neural", "llm", "llms", "gpt", "transformer", "model", "models",
                "training", "inference", "nlp", "computer vision", "agents",
            ],
            labels: ["AI/ML", "Machine Learning", "Artificial Intelligence"],
            suggestion: "Try following more AI researchers, ML engineers, and people who post about models they build, then search again.",
            expertise_areas: vec!["Artificial Intelligence", "Machine Learning", "AI Applications"],
            interests: vec!["AI research", "Emerging AI tools"],
        });
        m.insert(Topic::Engineering, TopicProfile {
            query_triggers: vec![
                "engineer", "engineers", "engineering", "developer", "developers", "software",
                "programming", "coding", "code", "backend", "frontend", "devops", "infrastructure",
                "rust", "python", "javascript",
            ],
            content_terms: vec![
                "code", "coding", "software", "engineering", "engineer", "developer",
                "programming", "api", "backend", "frontend", "database", "deploy",
                "infrastructure", "open source", "github", "rust", "python", "javascript",
                "typescript", "kubernetes", "compiler",
            ],
            labels: ["Engineering", "Software Development", "Technical"],
            suggestion: "Try connecting with more engineers and open-source maintainers, or import connections from developer communities.",
            expertise_areas: vec!["Software Engineering", "System Design", "Developer Tooling"],
            interests: vec!["Open source", "Developer tools"],
        });
        m.insert(Topic::Business, TopicProfile {
            query_triggers: vec![
                "founder", "founders", "startup", "startups", "business", "ceo", "entrepreneur",
                "entrepreneurs", "investor", "investors", "vc", "sales", "marketing",
            ],
            content_terms: vec![
                "startup", "founder", "cofounder", "ceo", "business", "revenue", "customers",
                "growth", "fundraising", "investors", "launch", "product", "market", "sales",
                "entrepreneur",
            ],
            labels: ["Startups", "Entrepreneurship", "Business"],
            suggestion: "Try following more founders, operators, and investors, or import your connections from startup communities.",
            expertise_areas: vec!["Entrepreneurship", "Business Strategy", "Product Growth"],
            interests: vec!["Startups", "Building companies"],
        });
        m.insert(Topic::Research, TopicProfile {
            query_triggers: vec![
                "research", "researcher", "researchers", "phd", "science", "scientist",
                "scientists", "academic", "academia", "professor", "paper", "papers",
            ],
            content_terms: vec![
                "research", "paper", "papers", "study", "phd", "university", "lab",
                "experiment", "published", "arxiv", "professor", "science", "scientist",
            ],
            labels: ["Research", "Academia", "Science"],
            suggestion: "Try following researchers and labs whose papers you read, then search again.",
            expertise_areas: vec!["Research", "Scientific Analysis", "Academic Writing"],
            interests: vec!["Scientific research", "New papers"],
        });
        m.insert(Topic::Design, TopicProfile {
            query_triggers: vec![
                "design", "designer", "designers", "ux", "ui", "product design", "figma",
                "creative", "brand", "illustration",
            ],
            content_terms: vec![
                "design", "designer", "ux", "ui", "figma", "typography", "brand",
                "illustration", "prototype", "interface", "creative",
            ],
            labels: ["Design", "UX/UI", "Creative"],
            suggestion: "Try connecting with more designers and creative professionals, then search again.",
            expertise_areas: vec!["Product Design", "User Experience", "Visual Design"],
            interests: vec!["Design craft", "Creative tools"],
        });
        m.insert(Topic::General, TopicProfile {
            query_triggers: vec![],
            content_terms: vec![],
            labels: ["Networking", "Professional", "Connections"],
            suggestion: "Try a more specific search, or grow your network by importing more connections, then search again.",
            expertise_areas: vec!["Professional Networking", "Online Community", "Knowledge Sharing"],
            interests: vec!["Professional growth", "Meeting new people"],
        });
        m
    };
}

impl Topic {
    pub fn profile(self) -> &'static TopicProfile {
        &TOPICS[&self]
    }

    pub fn labels(self) -> [&'static str; 3] {
        self.profile().labels
    }

    pub fn suggestion(self) -> &'static str {
        self.profile().suggestion
    }

    pub fn content_terms(self) -> &'static [&'static str] {
        &self.profile().content_terms
    }
}

pub fn classify_query(query: &str) -> Topic {
    let normalized = normalize_terms(query);
    TOPIC_ORDER
        .iter()
        .copied()
        .find(|topic| {
            topic
                .profile()
                .query_triggers
                .iter()
                .any(|t| contains_term(&normalized, t))
        })
        .unwrap_or(Topic::General)
}

pub fn matched_topics(normalized_content: &str, candidates: &[Topic]) -> Vec<Topic> {
    candidates
        .iter()
        .copied()
        .filter(|topic| {
            topic
                .content_terms()
                .iter()
                .any(|t| contains_term(normalized_content, t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topic_has_profile() {
        for topic in TOPIC_ORDER {
            assert_eq!(topic.labels().len(), 3);
            assert!(!topic.suggestion().is_empty());
            assert!(topic.profile().expertise_areas.len() >= 3);
            assert!(topic.profile().interests.len() >= 2);
        }
    }

    #[test]
    fn test_classify_query_first_match_wins() {
        assert_eq!(classify_query("AI founders"), Topic::AiMl);
        assert_eq!(classify_query("startup founders in Berlin"), Topic::Business);
        assert_eq!(classify_query("rust developers"), Topic::Engineering);
        assert_eq!(classify_query("PhD researchers"), Topic::Research);
        assert_eq!(classify_query("UX designers"), Topic::Design);
        assert_eq!(classify_query("people who like hiking"), Topic::General);
    }

    #[test]
    fn test_classify_query_whole_words() {
        assert_eq!(classify_query("people who said hello"), Topic::General);
    }

    #[test]
    fn test_matched_topics() {
        let text = normalize_terms("Training LLMs at a research lab; also a startup founder");
        let topics = matched_topics(&text, &[Topic::AiMl, Topic::Engineering, Topic::Business, Topic::Research]);
        assert_eq!(topics, vec![Topic::AiMl, Topic::Business, Topic::Research]);
    }
}
