use crate::models::Person;
use crate::utils::safe_truncate_ellipsis;

use super::schema::{ACHIEVEMENTS, EXPERTISE, INTERESTS, PERSONALITY_TRAITS};

const SNIPPET_CHARS: usize = 400;


pub const SYSTEM_PROMPT: &str = r#"You are a professional networking analyst. You write short, factual profiles of people based only on what they have publicly posted.

Never invent employers, titles, or achievements that the posts do not support. Always respond with a single valid JSON object and nothing else."#;


pub fn build_enrichment_prompt(person: &Person, snippets: &[String]) -> String {
    let posts = snippets
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, safe_truncate_ellipsis(s.trim(), SNIPPET_CHARS)))
        .collect::<Vec<_>>()
        .join("\n");

    let bio = person.bio().unwrap_or("(none)");

    format!(
        r#"{SYSTEM_PROMPT}

**Person:** {name} (@{handle}) on {platform}
**Bio:** {bio}

**Recent posts ({count}):**
{posts}

**Your Task:**
Build a profile of this person using only the posts above.

**Response Format (JSON):**
{{
  "overview": "2-3 sentence summary of who they are and what they focus on",
  "expertise": ["{e_min} to {e_max} areas of expertise"],
  "achievements": ["{a_min} to {a_max} notable achievements evidenced by the posts"],
  "interests": ["{i_min} to {i_max} interests"],
  "personality_traits": ["{p_min} to {p_max} traits"],
  "communication_style": "one sentence describing how they write",
  "connection_message": "a friendly, specific message to send when connecting",
  "timeline": [
    {{"type": "post|repost|like", "action": "short verb phrase", "content": "what it was about", "relative_time": "e.g. 2 days ago"}}
  ]
}}"#,
        name = person.display_name,
        handle = person.handle,
        platform = person.platform,
        count = snippets.len(),
        e_min = EXPERTISE.min,
        e_max = EXPERTISE.max,
        a_min = ACHIEVEMENTS.min,
        a_max = ACHIEVEMENTS.max,
        i_min = INTERESTS.min,
        i_max = INTERESTS.max,
        p_min = PERSONALITY_TRAITS.min,
        p_max = PERSONALITY_TRAITS.max,
    )
}
