pub mod collector;
pub mod core;
pub mod enrichment;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod store;
pub mod topics;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use utils::{safe_truncate, safe_truncate_ellipsis};


pub use core::config::RolodexConfig;
pub use core::error::{ErrorKind, Result, RolodexError};
pub use enrichment::{EnrichedProfile, EnrichmentEngine};
pub use models::{Person, PersonPatch, Platform, Provenance, RelationshipFlag};
pub use pipeline::{BatchReport, EnrichError, Pipeline};
pub use ranking::{RankedCandidate, RankingEngine, SearchResult};
pub use store::{JsonFileStore, MemoryStore, PersonStore};


pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";


pub const DEFAULT_LLM_MODEL: &str = "gemini-1.5-flash";


pub const DEFAULT_SCRAPE_PROGRAM: &str = "snscrape";
