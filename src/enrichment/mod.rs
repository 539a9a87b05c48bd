pub mod engine;
pub mod fallback;
pub mod models;
pub mod prompt;
pub mod schema;

pub use engine::EnrichmentEngine;
pub use fallback::{fallback_profile, fallback_profile_at};
pub use models::{EnrichedProfile, FieldSources, TimelineEntry};
pub use schema::{ListBounds, ProfileFields};
