//! # Keyword/Text Summarizer
//! Prepares the concatenated text corpus and a word-frequency view for the
//! external word-cloud renderer. Pure; missing content is an empty string.

use std::collections::HashMap;

use serde::Serialize;

use crate::ingest::types::SourceRecord;

/// Common English words excluded from the frequency view.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "an", "and", "are", "as", "at", "be", "been", "but", "by",
    "can", "do", "for", "from", "had", "has", "have", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "more", "my", "new", "no", "not", "of", "on", "or", "our", "out",
    "over", "so", "than", "that", "the", "their", "them", "then", "there", "they", "this",
    "to", "up", "was", "we", "what", "when", "which", "who", "will", "with", "would", "you",
    "your",
];

/// One concatenated text corpus: title + content per record, joined.
pub fn corpus(records: &[SourceRecord]) -> String {
    let mut parts = Vec::with_capacity(records.len());
    for r in records {
        if r.content.is_empty() {
            parts.push(r.title.clone());
        } else {
            parts.push(format!("{} {}", r.title, r.content));
        }
    }
    parts.join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Frequency view over the corpus: lowercase alphanumeric tokens minus
/// stopwords, sorted by count descending then alphabetically.
pub fn top_keywords(corpus: &str, limit: usize) -> Vec<KeywordCount> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for tok in corpus
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let w = tok.to_ascii_lowercase();
        if w.len() < 2 || STOPWORDS.contains(&w.as_str()) {
            continue;
        }
        *freq.entry(w).or_default() += 1;
    }

    let mut out: Vec<KeywordCount> = freq
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    out.truncate(limit);
    out
}
