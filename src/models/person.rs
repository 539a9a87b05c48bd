use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::enrichment::EnrichedProfile;


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    #[default]
    Twitter,
    Bluesky,
    Linkedin,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationshipFlag {
    FollowedBySelf,
    FollowsSelf,
    #[default]
    Mentioned,
}

impl RelationshipFlag {
    pub fn is_active(self) -> bool {
        matches!(self, Self::FollowedBySelf | Self::FollowsSelf)
    }
}


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimelineKind {
    Post,
    Repost,
    Like,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePost {
    pub kind: TimelineKind,
    pub content: String,
    pub posted_at: DateTime<Utc>,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetails {
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub posts: Vec<TimelinePost>,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub key: String,
    pub owner_id: String,
    pub display_name: String,
    pub handle: String,
    pub platform: Platform,
    #[serde(default)]
    pub quotes: Vec<String>,
    #[serde(default)]
    pub relationship: RelationshipFlag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProfileDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<EnrichedProfile>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn new(platform: Platform, handle: impl Into<String>, owner_id: impl Into<String>) -> Self {
        let handle = normalize_handle(&handle.into());
        Self {
            id: Uuid::new_v4(),
            key: person_key(platform, &handle),
            owner_id: owner_id.into(),
            display_name: handle.clone(),
            handle,
            platform,
            quotes: Vec::new(),
            relationship: RelationshipFlag::default(),
            category: None,
            details: None,
            profile: None,
            updated_at: Utc::now(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (platform, handle) = parse_person_key(key)?;
        Some(Self::new(platform, handle, ""))
    }

    pub fn bio(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.bio.as_deref())
            .filter(|b| !b.trim().is_empty())
    }

    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .or_else(|| self.bio())
            .unwrap_or("uncategorized")
    }

    pub fn apply(&mut self, patch: PersonPatch) {
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
        if let Some(quotes) = patch.quotes {
            self.quotes = quotes;
        }
        if let Some(relationship) = patch.relationship {
            self.relationship = relationship;
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(details) = patch.details {
            self.details = Some(details);
        }
        if let Some(profile) = patch.profile {
            self.profile = Some(profile);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPatch {
    pub owner_id: Option<String>,
    pub display_name: Option<String>,
    pub quotes: Option<Vec<String>>,
    pub relationship: Option<RelationshipFlag>,
    pub category: Option<String>,
    pub details: Option<ProfileDetails>,
    pub profile: Option<EnrichedProfile>,
}

impl PersonPatch {
    pub fn quotes(quotes: Vec<String>) -> Self {
        Self {
            quotes: Some(quotes),
            ..Default::default()
        }
    }

    pub fn profile(profile: EnrichedProfile) -> Self {
        Self {
            profile: Some(profile),
            ..Default::default()
        }
    }
}


pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}


pub fn person_key(platform: Platform, handle: &str) -> String {
    format!("{}:{}", platform, normalize_handle(handle))
}

pub fn parse_person_key(key: &str) -> Option<(Platform, String)> {
    let (platform, handle) = match key.split_once(':') {
        Some((platform, handle)) => (platform.parse().ok()?, handle),
        None => (Platform::Twitter, key),
    };
    let handle = normalize_handle(handle);
    if handle.is_empty() || handle.contains(char::is_whitespace) {
        return None;
    }
    Some((platform, handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_key_roundtrip() {
        let person = Person::new(Platform::Bluesky, "@Alice", "owner-1");
        assert_eq!(person.key, "bluesky:alice");
        assert_eq!(person.handle, "alice");
        assert_eq!(
            parse_person_key(&person.key),
            Some((Platform::Bluesky, "alice".to_string()))
        );
    }

    #[test]
    fn test_parse_person_key_rejects_garbage() {
        assert_eq!(parse_person_key("myspace:bob"), None);
        assert_eq!(parse_person_key("twitter:"), None);
        assert_eq!(parse_person_key("two words"), None);
        assert_eq!(
            parse_person_key("@Carol"),
            Some((Platform::Twitter, "carol".to_string()))
        );
    }

    #[test]
    fn test_patch_only_overwrites_supplied_fields() {
        let mut person = Person::new(Platform::Twitter, "dave", "owner");
        person.quotes = vec!["first".to_string()];
        person.category = Some("founder".to_string());

        person.apply(PersonPatch {
            display_name: Some("Dave D.".to_string()),
            ..Default::default()
        });

        assert_eq!(person.display_name, "Dave D.");
        assert_eq!(person.quotes, vec!["first".to_string()]);
        assert_eq!(person.category.as_deref(), Some("founder"));
    }

    #[test]
    fn test_relationship_activity() {
        assert!(RelationshipFlag::FollowedBySelf.is_active());
        assert!(RelationshipFlag::FollowsSelf.is_active());
        assert!(!RelationshipFlag::Mentioned.is_active());
    }
}
