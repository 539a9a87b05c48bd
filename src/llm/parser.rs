use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::utils::safe_truncate_ellipsis;

const SAMPLE_CHARS: usize = 160;

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([}\]])").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}


#[derive(Error, Debug, Clone, PartialEq)]
#[error("No JSON object could be extracted ({reason}); sample: {sample:?}")]
pub struct ParseError {
    pub reason: String,
    pub sample: String,
}

impl ParseError {
    fn new(reason: impl Into<String>, text: &str) -> Self {
        Self {
            reason: reason.into(),
            sample: safe_truncate_ellipsis(text.trim(), SAMPLE_CHARS),
        }
    }
}


pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::new("empty response", text));
    }

    let stripped = strip_code_fences(text);

    if let Some(object) = try_object(stripped) {
        return Ok(object);
    }

    let repaired = repair(stripped);
    if let Some(object) = try_object(&repaired) {
        debug!("JSON parsed after trailing-comma/whitespace repair");
        return Ok(object);
    }

    if let Some(region) = first_balanced_object(stripped) {
        if let Some(object) = try_object(region).or_else(|| try_object(&repair(region))) {
            debug!("JSON parsed from embedded object region");
            return Ok(object);
        }
    }

    Err(ParseError::new("all repair strategies failed", text))
}


pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(newline) if !rest[..newline].trim_start().starts_with('{') => &rest[newline + 1..],
            _ => rest,
        };
    }
    body.trim().trim_end_matches("```").trim()
}

fn try_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn repair(text: &str) -> String {
    let without_commas = TRAILING_COMMA.replace_all(text, "$1");
    WHITESPACE_RUN
        .replace_all(&without_commas, " ")
        .trim()
        .to_string()
}

fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
