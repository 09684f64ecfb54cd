use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

/// Discrete sentiment class derived from a polarity score.
///
/// `from_score` is the single derivation point; records expose the label
/// only as a method over their stored score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Fixed bins with inclusive upper boundaries:
    /// (-1, -0.05] -> Negative, (-0.05, 0.05] -> Neutral, (0.05, 1] -> Positive.
    pub fn from_score(score: f64) -> Self {
        if score <= -0.05 {
            SentimentLabel::Negative
        } else if score <= 0.05 {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Positive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Positive => "Positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon score for a single word (0.0 when absent).
    #[inline]
    fn word_score(&self, w: &str) -> f64 {
        LEXICON.get(w).copied().unwrap_or(0.0)
    }

    /// Polarity in [-1, 1]: the mean lexicon score over opinion words.
    ///
    /// Negation: if a negator appears within the preceding 1..=3 tokens,
    /// the word's lexicon score is sign-flipped. Text without any opinion
    /// word scores 0.0.
    pub fn polarity(&self, text: &str) -> f64 {
        // Collect tokens into a vector; negation needs backwards indexing.
        let tokens: Vec<String> = tokenize(text).collect();
        let mut sum = 0.0f64;
        let mut hits = 0usize;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0.0 {
                continue;
            }

            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            sum += if negated { -base } else { base };
            hits += 1;
        }

        if hits == 0 {
            0.0
        } else {
            (sum / hits as f64).clamp(-1.0, 1.0)
        }
    }
}

/// Module-level tokenization: alphanumeric tokens, lower-case.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
    )
}
