use serde_json::{Map, Value};

use super::models::TimelineEntry;
use crate::models::TimelineKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBounds {
    pub min: usize,
    pub max: usize,
}

impl ListBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && len <= self.max
    }
}

pub const EXPERTISE: ListBounds = ListBounds::new(3, 6);
pub const ACHIEVEMENTS: ListBounds = ListBounds::new(2, 5);
pub const INTERESTS: ListBounds = ListBounds::new(2, 7);
pub const PERSONALITY_TRAITS: ListBounds = ListBounds::new(2, 5);

pub const MAX_TIMELINE_ENTRIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub overview: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub personality_traits: Option<Vec<String>>,
    pub communication_style: Option<String>,
    pub connection_message: Option<String>,
    pub timeline: Option<Vec<TimelineEntry>>,
}

impl ProfileFields {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            overview: text_field(object.get("overview")),
            expertise: list_field(object.get("expertise"), EXPERTISE),
            achievements: list_field(object.get("achievements"), ACHIEVEMENTS),
            interests: list_field(object.get("interests"), INTERESTS),
            personality_traits: list_field(object.get("personality_traits"), PERSONALITY_TRAITS),
            communication_style: text_field(object.get("communication_style")),
            connection_message: text_field(object.get("connection_message")),
            timeline: timeline_field(object.get("timeline")),
        }
    }

    pub fn rejected(&self) -> Vec<&'static str> {
        let checks = [
            ("overview", self.overview.is_none()),
            ("expertise", self.expertise.is_none()),
            ("achievements", self.achievements.is_none()),
            ("interests", self.interests.is_none()),
            ("personality_traits", self.personality_traits.is_none()),
            ("communication_style", self.communication_style.is_none()),
            ("connection_message", self.connection_message.is_none()),
            ("timeline", self.timeline.is_none()),
        ];
        checks
            .into_iter()
            .filter(|(_, rejected)| *rejected)
            .map(|(name, _)| name)
            .collect()
    }
}


pub fn text_field(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}


pub fn list_field(value: Option<&Value>, bounds: ListBounds) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let text = item.as_str()?.trim();
        if text.is_empty() || out.iter().any(|o| o.eq_ignore_ascii_case(text)) {
            continue;
        }
        out.push(text.to_string());
    }
    out.truncate(bounds.max);
    (out.len() >= bounds.min).then_some(out)
}

pub fn timeline_field(value: Option<&Value>) -> Option<Vec<TimelineEntry>> {
    let items = match value {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(value) => value.as_array()?,
    };

    let mut entries = Vec::with_capacity(items.len().min(MAX_TIMELINE_ENTRIES));
    for item in items.iter().take(MAX_TIMELINE_ENTRIES) {
        let kind = item
            .get("type")
            .and_then(Value::as_str)
            .and_then(|k| k.trim().to_lowercase().parse::<TimelineKind>().ok())?;
        entries.push(TimelineEntry {
            kind,
            action: text_field(item.get("action"))?,
            content: text_field(item.get("content"))?,
            relative_time: text_field(item.get("relative_time"))?,
        });
    }
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_field_shapes() {
        assert_eq!(text_field(Some(&json!("  hi "))), Some("hi".to_string()));
        assert_eq!(text_field(Some(&json!("   "))), None);
        assert_eq!(text_field(Some(&json!(["hi"]))), None);
        assert_eq!(text_field(None), None);
    }

    #[test]
    fn test_list_field_bounds() {
        let too_short = json!(["Rust", "  ", "rust"]);
        assert_eq!(list_field(Some(&too_short), EXPERTISE), None);

        let too_long = json!(["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(list_field(Some(&too_long), EXPERTISE).map(|l| l.len()), Some(6));

        let mixed = json!(["a", 3, "c"]);
        assert_eq!(list_field(Some(&mixed), ACHIEVEMENTS), None);

        assert_eq!(list_field(Some(&json!("a, b, c")), EXPERTISE), None);
    }

    #[test]
    fn test_timeline_field() {
        assert_eq!(timeline_field(None), Some(Vec::new()));

        let good = json!([{
            "type": "Repost",
            "action": "Reposted a thread",
            "content": "on compilers",
            "relative_time": "2 days ago"
        }]);
        let entries = timeline_field(Some(&good)).unwrap();
        assert_eq!(entries[0].kind, TimelineKind::Repost);

        let bad = json!([{ "type": "bookmark", "action": "x", "content": "y", "relative_time": "z" }]);
        assert_eq!(timeline_field(Some(&bad)), None);
    }

    #[test]
    fn test_rejected_lists_missing_fields() {
        let object = json!({
            "overview": "Builds things",
            "expertise": ["Rust", "Compilers", "Databases"],
            "interests": ["only one"]
        });
        let fields = ProfileFields::from_object(object.as_object().unwrap());
        let rejected = fields.rejected();
        assert!(rejected.contains(&"interests"));
        assert!(rejected.contains(&"achievements"));
        assert!(!rejected.contains(&"overview"));
        assert!(!rejected.contains(&"expertise"));
        assert!(!rejected.contains(&"timeline"));
    }
}
