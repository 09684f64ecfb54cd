// src/ingest/mod.rs
pub mod providers;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "mention_events_total",
            "Raw items parsed from provider responses."
        );
        describe_counter!(
            "mention_kept_total",
            "Records kept after window/upvote/keyword filtering."
        );
        describe_counter!(
            "mention_provider_errors_total",
            "Provider fetch/parse/timeout errors."
        );
        describe_histogram!("mention_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!("mention_last_query_ts", "Unix ts when a query last ran.");
    });
}

/// Normalize post text: decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags (Hacker News story_text carries markup)
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Case-insensitive substring containment of `term` in title + content.
pub fn contains_term(title: &str, content: &str, term: &str) -> bool {
    let haystack = format!("{title} {content}").to_lowercase();
    haystack.contains(&term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_decodes_entities_and_strips_tags() {
        let s = "  <p>Hello&nbsp;&amp; <b>world</b></p>  ";
        assert_eq!(normalize_text(s), "Hello & world");
    }

    #[test]
    fn normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("a\n\n  b\tc"), "a b c");
    }

    #[test]
    fn contains_term_is_case_insensitive_substring() {
        assert!(contains_term("Acme ships a new widget", "", "acme"));
        assert!(contains_term("", "we compared ACME to others", "Acme"));
        assert!(!contains_term("unrelated title", "and body", "acme"));
    }
}
