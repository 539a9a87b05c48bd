pub mod config;
pub mod engine;
pub mod heuristic;
pub mod models;
pub mod prompt;

pub use config::RankingConfig;
pub use engine::{RankingEngine, RankingError};
pub use heuristic::{rank_people, score_person, HeuristicScore};
pub use models::{RankedCandidate, SearchResult};
