use chrono::{DateTime, Utc};

use super::models::{EnrichedProfile, FieldSources, TimelineEntry};
use super::schema::{ACHIEVEMENTS, EXPERTISE, INTERESTS, PERSONALITY_TRAITS};
use crate::collector::RawContent;
use crate::models::{Person, TimelineKind};
use crate::topics::{matched_topics, Topic};
use crate::utils::{normalize_terms, safe_truncate_ellipsis};

const PROFILE_TOPICS: [Topic; 5] = [
    Topic::AiMl,
    Topic::Engineering,
    Topic::Business,
    Topic::Research,
    Topic::Design,
];

const TIMELINE_LIMIT: usize = 5;
const TIMELINE_CONTENT_CHARS: usize = 140;


pub fn fallback_profile(person: &Person, content: &RawContent) -> EnrichedProfile {
    fallback_profile_at(person, content, Utc::now())
}


pub fn fallback_profile_at(person: &Person, content: &RawContent, now: DateTime<Utc>) -> EnrichedProfile {
    let normalized = normalize_terms(&content.snippets.join(" "));
    let topics = matched_topics(&normalized, &PROFILE_TOPICS);

    EnrichedProfile {
        overview: overview(person, &topics),
        expertise: expertise(&topics),
        achievements: achievements(person, content, &topics),
        interests: interests(&topics),
        personality_traits: personality_traits(content, &topics),
        communication_style: communication_style(content, &topics),
        connection_message: connection_message(person, &topics),
        timeline: timeline(person, content, now),
        sources: FieldSources::default(),
        content_provenance: content.provenance,
        generated_at: now,
    }
}

fn topic_phrase(topics: &[Topic]) -> Option<String> {
    let labels: Vec<&str> = topics.iter().map(|t| t.labels()[0]).collect();
    match labels.as_slice() {
        [] => None,
        [one] => Some(one.to_string()),
        [rest @ .., last] => Some(format!("{} and {}", rest.join(", "), last)),
    }
}

fn first_name(person: &Person) -> &str {
    person
        .display_name
        .split_whitespace()
        .next()
        .unwrap_or(person.handle.as_str())
}

fn overview(person: &Person, topics: &[Topic]) -> String {
    let mut overview = match topic_phrase(topics) {
        Some(phrase) => format!(
            "{} (@{}) is active on {} and posts mostly about {}.",
            person.display_name, person.handle, person.platform, phrase
        ),
        None => format!(
            "{} (@{}) is active on {} and shares updates with their network.",
            person.display_name, person.handle, person.platform
        ),
    };
    if let Some(bio) = person.bio() {
        overview.push_str(&format!(" Their bio reads: \"{}\"", safe_truncate_ellipsis(bio.trim(), 160)));
    }
    overview
}

fn collect_bounded(
    topics: &[Topic],
    pick: impl Fn(Topic) -> &'static [&'static str],
    min: usize,
    max: usize,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let sources = topics.iter().copied().chain(std::iter::once(Topic::General));
    for (index, topic) in sources.enumerate() {
        let is_padding = index >= topics.len();
        if is_padding && out.len() >= min {
            break;
        }
        for item in pick(topic) {
            if out.len() >= max || (is_padding && out.len() >= min) {
                break;
            }
            if !out.iter().any(|o| o == item) {
                out.push(item.to_string());
            }
        }
    }
    out
}

fn expertise(topics: &[Topic]) -> Vec<String> {
    collect_bounded(topics, |t| t.profile().expertise_areas.as_slice(), EXPERTISE.min, EXPERTISE.max)
}

fn interests(topics: &[Topic]) -> Vec<String> {
    collect_bounded(topics, |t| t.profile().interests.as_slice(), INTERESTS.min, INTERESTS.max)
}

fn achievements(person: &Person, content: &RawContent, topics: &[Topic]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if let Some(details) = &person.details {
        if details.followers > 0 {
            out.push(format!("Built an audience of {} followers", details.followers));
        }
        if details.verified {
            out.push(format!("Verified {} account", person.platform));
        }
    }
    if content.provenance.is_evidence() {
        out.push(format!("Published {} public posts in the collected sample", content.len()));
    }
    if let Some(topic) = topics.first() {
        out.push(format!("Regularly shares insights on {}", topic.labels()[0]));
    }

    for filler in [
        format!("Maintains an active {} presence", person.platform),
        "Keeps a public professional profile".to_string(),
    ] {
        if out.len() >= ACHIEVEMENTS.min {
            break;
        }
        out.push(filler);
    }
    out.truncate(ACHIEVEMENTS.max);
    out
}

fn personality_traits(content: &RawContent, topics: &[Topic]) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();
    let text = content.snippets.join(" ");

    if text.contains('?') {
        out.push("Curious");
    }
    if text.contains('!') {
        out.push("Enthusiastic");
    }
    if topics.len() >= 2 {
        out.push("Versatile");
    }
    for topic in topics {
        out.push(match topic {
            Topic::AiMl => "Forward-thinking",
            Topic::Engineering => "Analytical",
            Topic::Business => "Driven",
            Topic::Research => "Inquisitive",
            Topic::Design => "Creative",
            Topic::General => "Engaged",
        });
    }
    for filler in ["Engaged", "Professional"] {
        if out.len() >= PERSONALITY_TRAITS.min {
            break;
        }
        out.push(filler);
    }

    let mut traits: Vec<String> = Vec::new();
    for t in out {
        if !traits.iter().any(|x| x == t) {
            traits.push(t.to_string());
        }
    }
    if traits.len() < PERSONALITY_TRAITS.min {
        traits.push("Professional".to_string());
    }
    traits.truncate(PERSONALITY_TRAITS.max);
    traits
}

fn communication_style(content: &RawContent, topics: &[Topic]) -> String {
    let base = if !content.provenance.is_evidence() {
        "Too few public posts to judge tone; presents a concise public profile"
    } else {
        let total: usize = content.snippets.iter().map(|s| s.chars().count()).sum();
        match total / content.len().max(1) {
            0..80 => "Concise and direct, favoring short updates",
            80..=200 => "Conversational and balanced in tone",
            _ => "Detailed and explanatory, writing longer-form posts",
        }
    };
    match topic_phrase(topics) {
        Some(phrase) => format!("{base}, mostly about {phrase}."),
        None => format!("{base}."),
    }
}

fn connection_message(person: &Person, topics: &[Topic]) -> String {
    let name = first_name(person);
    match topic_phrase(topics) {
        Some(phrase) => format!(
            "Hi {name}, I came across your posts about {phrase} and would love to connect and swap ideas."
        ),
        None => format!("Hi {name}, I enjoyed reading your recent posts and would love to connect."),
    }
}

fn timeline(person: &Person, content: &RawContent, now: DateTime<Utc>) -> Vec<TimelineEntry> {
    let posts = person.details.as_ref().map(|d| d.posts.as_slice()).unwrap_or_default();
    if !posts.is_empty() {
        let mut posts: Vec<_> = posts.iter().collect();
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        return posts
            .into_iter()
            .take(TIMELINE_LIMIT)
            .map(|post| TimelineEntry {
                kind: post.kind,
                action: action_for(post.kind).to_string(),
                content: safe_truncate_ellipsis(&post.content, TIMELINE_CONTENT_CHARS),
                relative_time: relative_time(post.posted_at, now),
            })
            .collect();
    }

    if !content.provenance.is_evidence() {
        return Vec::new();
    }
    content
        .snippets
        .iter()
        .take(TIMELINE_LIMIT)
        .map(|snippet| TimelineEntry {
            kind: TimelineKind::Post,
            action: action_for(TimelineKind::Post).to_string(),
            content: safe_truncate_ellipsis(snippet, TIMELINE_CONTENT_CHARS),
            relative_time: "recently".to_string(),
        })
        .collect()
}

fn action_for(kind: TimelineKind) -> &'static str {
    match kind {
        TimelineKind::Post => "Posted",
        TimelineKind::Repost => "Reposted",
        TimelineKind::Like => "Liked a post",
    }
}


pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let (amount, unit) = if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    } else if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 7 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_days() < 30 {
        (elapsed.num_weeks(), "week")
    } else if elapsed.num_days() < 365 {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };
    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
