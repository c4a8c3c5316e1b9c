//! Canonical name decomposition
//!
//! Splits a full name into first / middle / last parts. Handles honorific
//! titles, generational and professional suffixes, the "Last, First Middle"
//! comma form, and quoted or parenthesized nicknames (`William "Bill" Gates`).

use lazy_static::lazy_static;
use std::collections::HashSet;

use super::normalize::normalize_form;

lazy_static! {
    /// Honorifics dropped from the front of a name
    static ref TITLES: HashSet<&'static str> = [
        "mr", "mrs", "ms", "miss", "mx", "dr", "prof", "professor", "sir", "dame",
        "lord", "lady", "rev", "hon", "judge", "gen", "col", "capt", "sgt", "st",
    ]
    .into_iter()
    .collect();

    /// Suffixes dropped from the end of a name
    static ref SUFFIXES: HashSet<&'static str> = [
        "jr", "sr", "ii", "iii", "iv", "v", "phd", "md", "esq", "cpa", "mba", "qc", "kc",
    ]
    .into_iter()
    .collect();
}

/// A full name decomposed into lower-cased parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub first: String,
    pub middle: Option<String>,
    pub last: String,
    /// Nicknames written into the name itself, e.g. `"bill"` in `William "Bill" Gates`
    pub nicknames: Vec<String>,
}

impl ParsedName {
    /// First letter or digit of the first name
    pub fn first_initial(&self) -> Option<char> {
        initial(&self.first)
    }

    /// First letter or digit of the middle name, if any
    pub fn middle_initial(&self) -> Option<char> {
        self.middle.as_deref().and_then(initial)
    }
}

fn initial(part: &str) -> Option<char> {
    part.chars().find(|c| c.is_alphanumeric())
}

fn has_content(token: &str) -> bool {
    initial(token).is_some()
}

/// Decompose a full name.
///
/// Quoted and parenthesized nicknames are pulled out first. A "Last, First"
/// comma form is split on the comma; otherwise titles and suffixes are
/// dropped and the last token is the family name. When dropping them leaves
/// fewer than two tokens ("Dr. Smith") the plain tokens are used instead.
/// Returns `None` when no first and last name with letters or digits can be
/// found.
pub fn parse_name(full_name: &str) -> Option<ParsedName> {
    let normalized = normalize_form(full_name);
    let (remaining, nicknames) = take_nicknames(&normalized);

    // Drop comma-separated suffix segments ("john smith, jr.") before
    // deciding whether this is the "last, first" form.
    let segments: Vec<&str> = remaining
        .split(',')
        .map(str::trim)
        .filter(|s| has_content(s))
        .filter(|s| !is_suffix(s))
        .collect();

    match segments.as_slice() {
        [] => None,
        [single] => parse_ordered(single, nicknames),
        [family, given, ..] => parse_comma_form(family, given, nicknames),
    }
}

/// "First Middle Last", with a whitespace fallback when affixes eat the name
fn parse_ordered(segment: &str, nicknames: Vec<String>) -> Option<ParsedName> {
    let tokens = content_tokens(segment);
    let stripped = strip_affixes(tokens.clone());
    let tokens = if stripped.len() >= 2 { stripped } else { tokens };

    let (first, rest) = tokens.split_first()?;
    let (last, middle) = rest.split_last()?;
    build(first, middle, last, nicknames)
}

/// "Last, First Middle". A given part made only of titles is no name.
fn parse_comma_form(family: &str, given: &str, nicknames: Vec<String>) -> Option<ParsedName> {
    let family = strip_affixes(content_tokens(family));
    let given = strip_affixes(content_tokens(given));

    let (first, middle) = given.split_first()?;
    build(first, middle, &family.join(" "), nicknames)
}

fn content_tokens(segment: &str) -> Vec<&str> {
    segment
        .split_whitespace()
        .filter(|t| has_content(t))
        .collect()
}

fn build(first: &str, middle: &[&str], last: &str, nicknames: Vec<String>) -> Option<ParsedName> {
    let first = first.trim();
    let last = last.trim();
    if !has_content(first) || !has_content(last) {
        return None;
    }

    let middle = middle.join(" ");
    Some(ParsedName {
        first: first.to_string(),
        middle: if middle.is_empty() { None } else { Some(middle) },
        last: last.to_string(),
        nicknames,
    })
}

/// Pull `"quoted"` and `(parenthesized)` nicknames out of the name.
fn take_nicknames(s: &str) -> (String, Vec<String>) {
    let mut nicknames = Vec::new();
    let mut remaining = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        let close = match c {
            '"' => '"',
            '\u{201c}' => '\u{201d}',
            '(' => ')',
            _ => {
                remaining.push(c);
                continue;
            }
        };
        let inner: String = chars.by_ref().take_while(|&ch| ch != close).collect();
        let inner = inner.trim();
        if !inner.is_empty() {
            nicknames.push(inner.to_string());
        }
        remaining.push(' ');
    }

    (remaining, nicknames)
}

/// Drop leading titles and trailing suffixes from a token list.
fn strip_affixes(mut tokens: Vec<&str>) -> Vec<&str> {
    while tokens.first().is_some_and(|t| is_title(t)) {
        tokens.remove(0);
    }
    while tokens.last().is_some_and(|t| is_suffix(t)) {
        tokens.pop();
    }
    tokens
}

fn bare(token: &str) -> String {
    token
        .trim_matches(|c: char| c == '.' || c == ',')
        .replace('.', "")
}

fn is_title(token: &str) -> bool {
    TITLES.contains(bare(token).as_str())
}

fn is_suffix(token: &str) -> bool {
    SUFFIXES.contains(bare(token).as_str())
}
