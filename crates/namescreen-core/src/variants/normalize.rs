//! Text normalization for name variants

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase and collapse runs of whitespace into single spaces.
pub(crate) fn normalize_form(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}

/// Collapse multiple whitespace characters into a single space, trimming both ends
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = true;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    if result.ends_with(' ') {
        result.pop();
    }
    result
}

/// Remove apostrophes, hyphens and periods ("o'brien" -> "obrien", "j. smith" -> "j smith").
pub(crate) fn strip_punctuation(s: &str) -> String {
    let stripped: String = s
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '-' | '\u{2010}' | '.'))
        .collect();
    collapse_whitespace(&stripped)
}

/// Fold accented letters to their base form ("josé maría" -> "jose maria").
///
/// Decomposes with NFKD and drops combining marks, so letters without an
/// ASCII base (e.g. "ø") are kept as they are.
pub fn fold_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_form() {
        assert_eq!(normalize_form("  John   SMITH "), "john smith");
        assert_eq!(normalize_form("Mary\tAnn\nLee"), "mary ann lee");
        assert_eq!(normalize_form("   "), "");
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("j. smith"), "j smith");
        assert_eq!(strip_punctuation("sarah johnson-smith"), "sarah johnsonsmith");
        assert_eq!(strip_punctuation("conan o'brien"), "conan obrien");
        assert_eq!(strip_punctuation("m. e. anderson"), "m e anderson");
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("josé maría gonzález"), "jose maria gonzalez");
        assert_eq!(fold_accents("françois müller"), "francois muller");
        assert_eq!(fold_accents("plain"), "plain");
    }
}
