//! Human-readable explanations for match decisions

use super::{Confidence, ScorePair};

pub(crate) fn no_data(no_variants: bool, no_article_names: bool) -> String {
    let what = match (no_variants, no_article_names) {
        (true, true) => "no usable name variants and no names in the article",
        (true, false) => "the target name could not be parsed into usable variants",
        _ => "no person names were found in the article",
    };
    format!("No data to compare: {what}.")
}

pub(crate) fn fuzzy_match(best: &ScorePair, high: f64) -> String {
    format!(
        "The name '{}' in the article matched the variant '{}' with score {:.1}, at or above the match threshold of {:.1}.",
        best.article_name, best.variant, best.fused, high
    )
}

pub(crate) fn fuzzy_no_match(best: &ScorePair, low: f64) -> String {
    format!(
        "No name in the article sufficiently matched. Highest similarity was '{}' against variant '{}' with score {:.1}, below the no-match threshold of {:.1}.",
        best.article_name, best.variant, best.fused, low
    )
}

pub(crate) fn disambiguated(
    best: &ScorePair,
    matched: bool,
    confidence: Confidence,
    reasoning: Option<&str>,
) -> String {
    let verdict = if matched { "same person" } else { "different person" };
    let mut text = format!(
        "Uncertain fuzzy score {:.1} for '{}' vs variant '{}'; disambiguation judged {} ({} confidence).",
        best.fused, best.article_name, best.variant, verdict, confidence
    );
    if let Some(reasoning) = reasoning.map(str::trim).filter(|r| !r.is_empty()) {
        text.push_str(" Reasoning: ");
        text.push_str(reasoning);
    }
    text
}

pub(crate) fn oracle_failed(best: &ScorePair, error: &str) -> String {
    format!(
        "Uncertain fuzzy score {:.1} for '{}' vs variant '{}', and disambiguation failed ({}). Defaulting to NO MATCH with low confidence; this may be a false negative and should be reviewed manually.",
        best.fused, best.article_name, best.variant, error
    )
}
