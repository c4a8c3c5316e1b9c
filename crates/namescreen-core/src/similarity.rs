//! Similarity scoring between two name strings
//!
//! Four metrics on a 0-100 scale, all built on character-level normalized
//! Levenshtein similarity, plus a weighted fusion of them. Token-based
//! metrics carry most of the weight because personal names vary in token
//! order and completeness more than in spelling.

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

/// Individual metric scores for one comparison, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScores {
    pub ratio: f64,
    pub partial_ratio: f64,
    pub token_sort_ratio: f64,
    pub token_set_ratio: f64,
}

/// Weights used to fuse the four metrics into one score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub token_set: f64,
    pub token_sort: f64,
    pub ratio: f64,
    pub partial: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            token_set: 0.4,
            token_sort: 0.3,
            ratio: 0.2,
            partial: 0.1,
        }
    }
}

impl FusionWeights {
    pub fn total(&self) -> f64 {
        self.token_set + self.token_sort + self.ratio + self.partial
    }

    /// Fuse metric scores into one value in [0, 100], rounded to two decimals
    pub fn fuse(&self, scores: &SimilarityScores) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }

        let weighted = self.token_set * scores.token_set_ratio
            + self.token_sort * scores.token_sort_ratio
            + self.ratio * scores.ratio
            + self.partial * scores.partial_ratio;

        round2((weighted / total).clamp(0.0, 100.0))
    }
}

/// Compute all four metrics for a pair of strings
pub fn score(a: &str, b: &str) -> SimilarityScores {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    SimilarityScores {
        ratio: ratio(&a, &b),
        partial_ratio: partial_ratio(&a, &b),
        token_sort_ratio: token_sort_ratio(&a, &b),
        token_set_ratio: token_set_ratio(&a, &b),
    }
}

/// Character-level Levenshtein similarity (0-100)
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// Best `ratio` of the shorter string against every equal-length window of the longer
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if shorter.len() == longer.len() {
        return ratio(a, b);
    }

    let needle: String = shorter.iter().collect();
    let mut best: f64 = 0.0;
    for window in longer.windows(shorter.len()) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(&needle, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// `ratio` after sorting tokens alphabetically
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a_tokens = sorted_tokens(a);
    let b_tokens = sorted_tokens(b);
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }
    ratio(&a_tokens.join(" "), &b_tokens.join(" "))
}

/// Order- and repetition-insensitive token comparison.
///
/// Compares the shared tokens against each side's shared-plus-remaining
/// tokens, so a name fully contained in the other scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let mut a_tokens = sorted_tokens(a);
    let mut b_tokens = sorted_tokens(b);
    a_tokens.dedup();
    b_tokens.dedup();
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = a_tokens
        .iter()
        .filter(|t| b_tokens.contains(t))
        .map(String::as_str)
        .collect();
    let only_a: Vec<&str> = a_tokens
        .iter()
        .filter(|t| !b_tokens.contains(t))
        .map(String::as_str)
        .collect();
    let only_b: Vec<&str> = b_tokens
        .iter()
        .filter(|t| !a_tokens.contains(t))
        .map(String::as_str)
        .collect();

    let t0 = shared.join(" ");
    let t1 = join_nonempty(&t0, &only_a.join(" "));
    let t2 = join_nonempty(&t0, &only_b.join(" "));

    ratio(&t0, &t1).max(ratio(&t0, &t2)).max(ratio(&t1, &t2))
}

/// Lowercase, replace non-alphanumerics with spaces, split and sort
fn sorted_tokens(s: &str) -> Vec<String> {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    tokens.sort_unstable();
    tokens
}

fn join_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
