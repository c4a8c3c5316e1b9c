//! Name variant generation
//!
//! Expands a canonical full name into the surface forms it is likely to take
//! in news text: nicknames, initials, middle name used as first name, split
//! hyphenated surnames, and punctuation- and accent-insensitive copies.

mod nicknames;
mod normalize;
mod parse;

use std::collections::BTreeSet;

pub use nicknames::{NicknameSource, NicknameTable, MAX_EXTERNAL_NICKNAMES};
pub use normalize::fold_accents;
pub use parse::{parse_name, ParsedName};

use normalize::{normalize_form, strip_punctuation};

/// Normalized surface forms of one name. Sorted, so iteration order is fixed.
pub type VariantSet = BTreeSet<String>;

/// Expands canonical names into variant sets
pub struct VariantGenerator<'a> {
    table: NicknameTable,
    source: Option<&'a dyn NicknameSource>,
    max_external: usize,
}

impl Default for VariantGenerator<'_> {
    fn default() -> Self {
        Self::new(NicknameTable::builtin())
    }
}

impl<'a> VariantGenerator<'a> {
    pub fn new(table: NicknameTable) -> Self {
        Self {
            table,
            source: None,
            max_external: MAX_EXTERNAL_NICKNAMES,
        }
    }

    /// Attach an external nickname source
    pub fn with_source(mut self, source: &'a dyn NicknameSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Cap on nicknames taken from the external source
    pub fn with_max_external(mut self, max: usize) -> Self {
        self.max_external = max.min(MAX_EXTERNAL_NICKNAMES);
        self
    }

    pub fn table(&self) -> &NicknameTable {
        &self.table
    }

    /// Generate the variant set for a full name.
    ///
    /// Returns an empty set when no first and last name can be determined.
    pub fn generate(&self, full_name: &str) -> VariantSet {
        let Some(name) = parse_name(full_name) else {
            tracing::debug!(name = full_name, "name could not be parsed, no variants");
            return VariantSet::new();
        };

        let nicknames = self.nicknames(&name);
        let forms = base_forms(&name, &nicknames);

        let mut variants = VariantSet::new();
        for form in forms {
            let form = normalize_form(&form);
            let stripped = strip_punctuation(&form);
            let folded = fold_accents(&form);
            let folded_stripped = strip_punctuation(&folded);
            for v in [form, stripped, folded, folded_stripped] {
                if !v.is_empty() {
                    variants.insert(v);
                }
            }
        }

        tracing::debug!(name = full_name, count = variants.len(), "generated name variants");
        variants
    }

    /// Nicknames from the name itself, the table, then the external source
    fn nicknames(&self, name: &ParsedName) -> Vec<String> {
        let mut nicknames: Vec<String> = Vec::new();
        let mut push = |nick: &str| {
            let nick = normalize_form(nick);
            if !nick.is_empty() && nick != name.first && !nicknames.contains(&nick) {
                nicknames.push(nick);
            }
        };

        for nick in name.nicknames.iter().chain(self.table.get(&name.first)) {
            push(nick.as_str());
        }
        if let Some(source) = self.source {
            match source.nicknames_for(&name.first) {
                Ok(found) => {
                    for nick in found.iter().take(self.max_external) {
                        // A single-word nickname only; anything else is noise.
                        if nick.split_whitespace().count() == 1 {
                            push(nick.as_str());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(first = %name.first, "nickname lookup failed: {}", e);
                }
            }
        }

        nicknames
    }
}

/// Generate variants with the built-in nickname table and no external source
pub fn generate(full_name: &str) -> VariantSet {
    VariantGenerator::default().generate(full_name)
}

/// The raw (not yet normalized) forms for a parsed name
fn base_forms(name: &ParsedName, nicknames: &[String]) -> Vec<String> {
    let first = name.first.as_str();
    let last = name.last.as_str();
    let mut forms = vec![format!("{first} {last}")];

    let middle_initial = name.middle_initial();
    if let (Some(middle), Some(mi)) = (name.middle.as_deref(), middle_initial) {
        forms.push(format!("{first} {middle} {last}"));
        forms.push(format!("{first} {mi}. {last}"));
        // Middle name used as the everyday first name
        forms.push(format!("{middle} {last}"));
        if middle.chars().count() > 1 {
            forms.push(format!("{mi}. {last}"));
        }
    }

    if let Some(fi) = name.first_initial() {
        forms.push(format!("{fi}. {last}"));
        forms.push(format!("{fi} {last}"));
        if let Some(mi) = middle_initial {
            forms.push(format!("{fi}. {mi}. {last}"));
            forms.push(format!("{fi}.{mi}. {last}"));
        }
    }

    for nick in nicknames {
        forms.push(format!("{nick} {last}"));
        if let Some(mi) = middle_initial {
            forms.push(format!("{nick} {mi}. {last}"));
        }
    }

    if last.contains('-') {
        for part in last
            .split('-')
            .map(str::trim)
            .filter(|p| p.chars().any(char::is_alphanumeric))
        {
            forms.push(format!("{first} {part}"));
        }
    }

    forms
}
