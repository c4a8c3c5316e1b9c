//! Person-name extraction from article text
//!
//! The engine only needs a list of candidate names; how they are found is up
//! to the [`NameExtractor`]. [`HeuristicExtractor`] is a deterministic,
//! dependency-free default: it picks runs of two to four capitalised tokens
//! (words or initials) and drops honorifics and sentence-initial function
//! words. It will miss lower-cased names and pick up some capitalised
//! non-names ("New York"). Text set entirely in capitals ("BILL GATES") is
//! not recognised. A proper NER model can be plugged in instead.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Supplies candidate person names for an article
pub trait NameExtractor: Send + Sync {
    /// Candidate names, lower-cased, in a deterministic order
    fn extract_names(&self, article_text: &str) -> Vec<String>;
}

lazy_static! {
    /// A capitalised word (O'Brien, McDonald, Johnson-Smith), a run of initials
    /// (J., M.E.) or a bare capital standing alone as an initial (Harry S Truman)
    static ref NAME_RUN: Regex = {
        let word = r"\p{Lu}[\p{Ll}'\x{2019}]+(?:\p{Lu}[\p{Ll}'\x{2019}]+)*(?:-\p{Lu}[\p{Ll}'\x{2019}]+)*";
        let initials = r"\p{Lu}\.(?:\s?\p{Lu}\.)*";
        let bare_initial = r"\b\p{Lu}\b";
        let token = format!("(?:{initials}|{word}|{bare_initial})");
        Regex::new(&format!(r"{token}(?:[ \t]+{token}){{1,3}}")).unwrap()
    };

    /// Leading tokens that start a capitalised run without being part of a name
    static ref LEADING_NOISE: HashSet<&'static str> = [
        // honorifics
        "mr", "mrs", "ms", "miss", "dr", "prof", "professor", "sir", "dame", "lord", "lady",
        "rev", "judge", "justice", "senator", "sen", "rep", "president", "governor", "mayor",
        "minister", "chairman", "ceo", "officer", "detective", "inspector", "general",
        // sentence-initial function words
        "the", "a", "an", "and", "but", "or", "in", "on", "at", "by", "for", "from", "to",
        "with", "after", "before", "when", "while", "yesterday", "today", "however", "according",
        "former", "local", "police", "said", "says", "later", "then", "meanwhile",
    ]
    .into_iter()
    .collect();
}

/// Regex-based capitalised-run extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl NameExtractor for HeuristicExtractor {
    fn extract_names(&self, article_text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for m in NAME_RUN.find_iter(article_text) {
            let Some(name) = clean_run(m.as_str()) else {
                continue;
            };
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }

        tracing::debug!(count = names.len(), "extracted candidate names");
        names
    }
}

/// Strip leading noise tokens; keep runs that still have two or more tokens.
fn clean_run(run: &str) -> Option<String> {
    let mut tokens: Vec<&str> = split_tokens(run);
    while tokens
        .first()
        .is_some_and(|t| LEADING_NOISE.contains(t.trim_end_matches('.').to_lowercase().as_str()))
    {
        tokens.remove(0);
    }
    if tokens.len() < 2 {
        return None;
    }
    Some(tokens.join(" ").to_lowercase())
}

/// Whitespace split that keeps "M. E." style initials as one token
fn split_tokens(run: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev_end = 0;

    for (i, part) in run.split_whitespace().map(|p| (offset_of(run, p), p)) {
        let is_initial = part.len() <= 4 && part.ends_with('.');
        let continues_initials = is_initial
            && start.is_some_and(|s| run[s..prev_end].ends_with('.'))
            && run[prev_end..i].len() == 1;
        if continues_initials {
            tokens.pop();
        } else {
            start = Some(i);
        }
        prev_end = i + part.len();
        if let Some(s) = start {
            tokens.push(&run[s..prev_end]);
        }
    }
    tokens
}

fn offset_of(haystack: &str, part: &str) -> usize {
    part.as_ptr() as usize - haystack.as_ptr() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        HeuristicExtractor.extract_names(text)
    }

    #[test]
    fn test_simple_names() {
        assert_eq!(
            extract("John Smith, a local businessman, was arrested yesterday for fraud."),
            vec!["john smith"]
        );
        assert_eq!(
            extract("Bill Johnson announced his retirement from the company today."),
            vec!["bill johnson"]
        );
    }

    #[test]
    fn test_initials() {
        assert_eq!(
            extract("M.E. Anderson was promoted to senior vice president."),
            vec!["m.e. anderson"]
        );
        assert_eq!(extract("A report by J. Smith appeared."), vec!["j. smith"]);
        assert_eq!(extract("Then M. E. Anderson spoke."), vec!["m. e. anderson"]);
        assert_eq!(extract("Harry S Truman spoke."), vec!["harry s truman"]);
    }

    #[test]
    fn test_capitals_inside_words_are_not_initials() {
        assert!(extract("The ABC Smith report").is_empty());
        assert!(extract("BILL GATES laughed.").is_empty());
    }

    #[test]
    fn test_honorifics_and_sentence_starts() {
        assert_eq!(extract("Dr. Jane Doe testified."), vec!["jane doe"]);
        assert_eq!(
            extract("The Smith Foundation and Mayor Robert Wilson met."),
            vec!["smith foundation", "robert wilson"]
        );
    }

    #[test]
    fn test_complex_surnames() {
        assert_eq!(extract("Conan O'Brien joked."), vec!["conan o'brien"]);
        assert_eq!(extract("Ronald McDonald waved."), vec!["ronald mcdonald"]);
        assert_eq!(
            extract("Sarah Johnson-Smith was quoted."),
            vec!["sarah johnson-smith"]
        );
    }

    #[test]
    fn test_accented_names() {
        assert_eq!(
            extract("José González announced his candidacy for mayor."),
            vec!["josé gonzález"]
        );
    }

    #[test]
    fn test_duplicates_dropped_in_order() {
        assert_eq!(
            extract("Jane Doe met John Smith; then Jane Doe left."),
            vec!["jane doe", "john smith"]
        );
    }

    #[test]
    fn test_no_names() {
        assert!(extract("").is_empty());
        assert!(extract("nothing capitalised here at all").is_empty());
        assert!(extract("Alone.").is_empty());
    }
}
