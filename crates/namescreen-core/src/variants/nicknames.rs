//! Nickname lookup
//!
//! A static table maps canonical first names to ordered nickname lists. The
//! table can be extended at runtime from a TOML file:
//!
//! ```toml
//! [nicknames]
//! william = ["bill", "billy", "will"]
//! margaret = ["peggy", "maggie"]
//! ```
//!
//! An optional [`NicknameSource`] adds best-effort lookups from an external
//! service on top of the table.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LookupError, TableError};

/// Maximum number of nicknames taken from an external source per name
pub const MAX_EXTERNAL_NICKNAMES: usize = 5;

/// Built-in canonical first name -> nicknames
const BUILTIN: &[(&str, &[&str])] = &[
    ("alexander", &["alex", "sandy", "xander"]),
    ("andrew", &["andy", "drew"]),
    ("anthony", &["tony"]),
    ("benjamin", &["ben", "benny"]),
    ("catherine", &["cathy", "kate", "katie"]),
    ("charles", &["charlie", "chuck", "chas"]),
    ("christopher", &["chris", "kit"]),
    ("daniel", &["dan", "danny"]),
    ("david", &["dave", "davy"]),
    ("deborah", &["debbie", "deb"]),
    ("edward", &["ed", "eddie", "ted", "ned"]),
    ("elizabeth", &["liz", "beth", "betty", "lizzie", "eliza"]),
    ("francis", &["frank", "fran"]),
    ("frederick", &["fred", "freddie"]),
    ("gregory", &["greg"]),
    ("henry", &["hank", "harry"]),
    ("james", &["jim", "jimmy"]),
    ("jennifer", &["jen", "jenny"]),
    ("john", &["jack", "johnny"]),
    ("jonathan", &["jon", "jonny"]),
    ("joseph", &["joe", "joey"]),
    ("katherine", &["kathy", "kate", "katie"]),
    ("lawrence", &["larry"]),
    ("margaret", &["maggie", "peggy", "meg"]),
    ("matthew", &["matt"]),
    ("michael", &["mike", "mickey"]),
    ("nicholas", &["nick", "nicky"]),
    ("patricia", &["pat", "patty", "trish"]),
    ("patrick", &["pat", "paddy"]),
    ("peter", &["pete"]),
    ("richard", &["rick", "dick", "rich"]),
    ("robert", &["bob", "bobby", "rob", "robbie"]),
    ("ronald", &["ron", "ronnie"]),
    ("samuel", &["sam", "sammy"]),
    ("stephen", &["steve"]),
    ("steven", &["steve"]),
    ("susan", &["sue", "susie"]),
    ("theodore", &["ted", "theo"]),
    ("thomas", &["tom", "tommy"]),
    ("timothy", &["tim", "timmy"]),
    ("victoria", &["vicky", "tori"]),
    ("william", &["bill", "billy", "will"]),
];

/// Canonical first name -> ordered nicknames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NicknameTable {
    entries: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default)]
    nicknames: BTreeMap<String, Vec<String>>,
}

impl NicknameTable {
    /// An empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table of common English given names
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (name, nicks) in BUILTIN {
            table.extend_entry(name, nicks.iter().copied());
        }
        table
    }

    /// Parse a table from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self, TableError> {
        let file: TableFile =
            toml::from_str(toml_str).map_err(|e| TableError::Parse(e.to_string()))?;
        let mut table = Self::empty();
        for (name, nicks) in &file.nicknames {
            table.extend_entry(name, nicks.iter().map(String::as_str));
        }
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Append another table's entries after this table's, dropping duplicates
    pub fn merge(&mut self, other: &NicknameTable) {
        for (name, nicks) in &other.entries {
            self.extend_entry(name, nicks.iter().map(String::as_str));
        }
    }

    /// Nicknames for a first name, in table order
    pub fn get(&self, first_name: &str) -> &[String] {
        self.entries
            .get(&first_name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extend_entry<'a>(&mut self, name: &str, nicks: impl Iterator<Item = &'a str>) {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        let list = self.entries.entry(key).or_default();
        for nick in nicks {
            let nick = nick.trim().to_lowercase();
            if !nick.is_empty() && !list.contains(&nick) {
                list.push(nick);
            }
        }
    }
}

/// External, best-effort nickname lookup (e.g. a knowledge service or LLM).
///
/// Implementations may be slow or unreliable; the variant generator caps the
/// result at [`MAX_EXTERNAL_NICKNAMES`] and treats any error as "no nicknames".
pub trait NicknameSource: Send + Sync {
    fn nicknames_for(&self, first_name: &str) -> Result<Vec<String>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let table = NicknameTable::builtin();
        assert_eq!(table.get("william"), ["bill", "billy", "will"]);
        assert_eq!(table.get("  Robert "), ["bob", "bobby", "rob", "robbie"]);
        assert!(table.get("zebulon").is_empty());
    }

    #[test]
    fn test_lookup_is_keyed_by_canonical_name_only() {
        let table = NicknameTable::builtin();
        assert!(table.get("bob").is_empty());
        assert!(table.get("bill").is_empty());

        let variants = crate::variants::generate("Bob Smith");
        assert!(variants.contains("bob smith"));
        assert!(!variants.contains("robert smith"));
    }

    #[test]
    fn test_from_toml() {
        let table = NicknameTable::from_toml(
            r#"
            [nicknames]
            Margaret = ["Peggy", "maggie", "peggy"]
            "#,
        )
        .unwrap();
        assert_eq!(table.get("margaret"), ["peggy", "maggie"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(NicknameTable::from_toml("nicknames = 3").is_err());
    }

    #[test]
    fn test_merge_appends_after_builtin() {
        let mut table = NicknameTable::builtin();
        let extra = NicknameTable::from_toml(
            r#"
            [nicknames]
            william = ["will", "liam"]
            zebulon = ["zeb"]
            "#,
        )
        .unwrap();
        table.merge(&extra);
        assert_eq!(table.get("william"), ["bill", "billy", "will", "liam"]);
        assert_eq!(table.get("zebulon"), ["zeb"]);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nicknames.toml");
        std::fs::write(&path, "[nicknames]\nalfred = [\"alf\", \"fred\"]\n").unwrap();

        let table = NicknameTable::load_file(&path).unwrap();
        assert_eq!(table.get("alfred"), ["alf", "fred"]);

        let missing = NicknameTable::load_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(TableError::Io { .. })));
    }
}
