use serde_json::json;

use crate::models::Person;
use crate::utils::safe_truncate_ellipsis;

const QUOTE_CHARS: usize = 200;


pub const SYSTEM_PROMPT: &str = r#"You are a relationship analyst helping someone find the right people in their own network. Judge relevance only from what each person has posted.

Always respond with valid JSON."#;

pub fn summarize_candidates(people: &[&Person], sample_size: usize) -> String {
    people
        .iter()
        .map(|p| {
            let sample: Vec<String> = p
                .quotes
                .iter()
                .take(sample_size)
                .map(|q| safe_truncate_ellipsis(q.trim(), QUOTE_CHARS))
                .collect();
            json!({
                "id": p.key,
                "name": p.display_name,
                "category": p.category_label(),
                "content": sample,
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}


pub fn build_ranking_prompt(query: &str, people: &[&Person], sample_size: usize) -> String {
    let candidates = summarize_candidates(people, sample_size);

    format!(
        r#"{SYSTEM_PROMPT}

**Search Query:**
"{query}"

**Candidates ({count}):**
{candidates}

**Your Task:**
Score how relevant each candidate is to the query.

Rules:
- Score every candidate from 1 (unrelated) to 10 (exactly what was asked for)
- Use only the ids listed above
- Give exactly 3 short topical keywords describing the query
- Keep each explanation to one sentence

**Response Format (JSON):**
{{
  "candidates": [
    {{"id": "platform:handle", "score": 1-10, "explanation": "why they match"}}
  ],
  "keywords": ["keyword1", "keyword2", "keyword3"],
  "explanation": "one or two sentences summarizing the results"
}}"#,
        count = people.len(),
    )
}
