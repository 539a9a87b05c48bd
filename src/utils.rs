#[inline]
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}


#[inline]
pub fn safe_truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}

pub fn normalize_terms(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push_str(&word.to_lowercase());
        out.push(' ');
    }
    out
}

pub fn contains_term(normalized: &str, term: &str) -> bool {
    let needle = normalize_terms(term);
    if needle.trim().is_empty() {
        return false;
    }
    normalized.contains(&needle)
}

pub fn query_keywords(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in normalize_terms(query).split_whitespace() {
        if word.chars().count() > 2 && !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_multibyte() {
        assert_eq!(safe_truncate("Привет мир", 6), "Привет");
        assert_eq!(safe_truncate("hi", 10), "hi");
    }

    #[test]
    fn test_safe_truncate_ellipsis() {
        assert_eq!(safe_truncate_ellipsis("hello world", 5), "hello...");
        assert_eq!(safe_truncate_ellipsis("hi", 10), "hi");
    }

    #[test]
    fn test_contains_term_whole_words_only() {
        let text = normalize_terms("She said we're building an AI startup!");
        assert!(contains_term(&text, "ai"));
        assert!(contains_term(&text, "startup"));
        assert!(!contains_term(&text, "start"));

        let vacation = normalize_terms("enjoying my vacation");
        assert!(!contains_term(&vacation, "ai"));
    }

    #[test]
    fn test_contains_term_phrase() {
        let text = normalize_terms("Working on Machine-Learning infra");
        assert!(contains_term(&text, "machine learning"));
        assert!(!contains_term(&text, "deep learning"));
    }

    #[test]
    fn test_query_keywords_filters_short_words() {
        assert_eq!(query_keywords("AI founders in SF"), vec!["founders"]);
        assert_eq!(
            query_keywords("Rust rust compiler experts"),
            vec!["rust", "compiler", "experts"]
        );
        assert!(query_keywords("   ").is_empty());
    }
}
