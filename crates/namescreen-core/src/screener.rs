//! End-to-end screening: name + article text -> decision

use serde::{Deserialize, Serialize};

use crate::config::ScreeningConfig;
use crate::decision::{DisambiguationOracle, MatchDecider, MatchDecision, NoOracle, Thresholds};
use crate::error::TableError;
use crate::extract::{HeuristicExtractor, NameExtractor};
use crate::variants::{NicknameSource, NicknameTable, VariantGenerator, VariantSet};

/// Everything produced while screening one name against one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub target_name: String,
    pub variants: VariantSet,
    pub article_names: Vec<String>,
    pub decision: MatchDecision,
}

/// Bundles variant generation, name extraction and the match decider
pub struct Screener<'a> {
    generator: VariantGenerator<'a>,
    extractor: Box<dyn NameExtractor + 'a>,
    decider: MatchDecider<Box<dyn DisambiguationOracle + 'a>>,
    thresholds: Thresholds,
}

impl Default for Screener<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Screener<'a> {
    /// Built-in nickname table, heuristic extractor, no oracle, default thresholds
    pub fn new() -> Self {
        Self {
            generator: VariantGenerator::default(),
            extractor: Box::new(HeuristicExtractor),
            decider: MatchDecider::new(Box::new(NoOracle)),
            thresholds: Thresholds::default(),
        }
    }

    /// Build from configuration, merging any extra nickname table it names
    pub fn from_config(config: &ScreeningConfig) -> Result<Self, TableError> {
        let mut table = NicknameTable::builtin();
        if let Some(path) = &config.nicknames.extra_table {
            table.merge(&NicknameTable::load_file(path)?);
        }

        Ok(Self {
            generator: VariantGenerator::new(table).with_max_external(config.nicknames.max_external),
            extractor: Box::new(HeuristicExtractor),
            decider: MatchDecider::new(Box::new(NoOracle) as Box<dyn DisambiguationOracle + 'a>)
                .with_weights(config.weights)
                .with_limits(config.oracle),
            thresholds: config.thresholds,
        })
    }

    pub fn with_oracle(mut self, oracle: impl DisambiguationOracle + 'a) -> Self {
        let weights = *self.decider.weights();
        let limits = *self.decider.limits();
        self.decider = MatchDecider::new(Box::new(oracle) as Box<dyn DisambiguationOracle + 'a>)
            .with_weights(weights)
            .with_limits(limits);
        self
    }

    pub fn with_extractor(mut self, extractor: impl NameExtractor + 'a) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_nickname_source(mut self, source: &'a dyn NicknameSource) -> Self {
        self.generator = self.generator.with_source(source);
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn generator(&self) -> &VariantGenerator<'a> {
        &self.generator
    }

    /// Screen a name against raw article text
    pub fn screen(&self, full_name: &str, article_text: &str) -> ScreeningOutcome {
        let article_names = self.extractor.extract_names(article_text);
        self.screen_names(full_name, article_names)
    }

    /// Screen a name against names already extracted from an article
    pub fn screen_names(&self, full_name: &str, article_names: Vec<String>) -> ScreeningOutcome {
        let variants = self.generator.generate(full_name);
        let decision = self
            .decider
            .decide_for(full_name, &variants, &article_names, self.thresholds);

        tracing::info!(
            target_name = full_name,
            matched = decision.matched,
            method = %decision.method,
            confidence = %decision.confidence,
            score = ?decision.score,
            "screening complete"
        );

        ScreeningOutcome {
            target_name: full_name.to_string(),
            variants,
            article_names,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Confidence, MatchMethod};

    #[test]
    fn test_screen_exact_name() {
        let outcome = Screener::new().screen(
            "John Smith",
            "John Smith, a local businessman, was arrested yesterday for fraud.",
        );
        assert_eq!(outcome.article_names, vec!["john smith"]);
        assert!(outcome.variants.contains("john smith"));
        assert!(outcome.decision.matched);
        assert_eq!(outcome.decision.confidence, Confidence::High);
    }

    #[test]
    fn test_screen_no_names_in_article() {
        let outcome = Screener::new().screen("John Smith", "markets fell sharply today.");
        assert!(!outcome.decision.matched);
        assert_eq!(outcome.decision.method, MatchMethod::NoData);
    }

    #[test]
    fn test_from_config_with_extra_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("nicknames.toml");
        std::fs::write(&table, "[nicknames]\nzebulon = [\"zeb\"]\n").unwrap();

        let mut config = ScreeningConfig::default();
        config.nicknames.extra_table = Some(table);
        let screener = Screener::from_config(&config).unwrap();

        let outcome = screener.screen_names("Zebulon Pike", vec!["zeb pike".to_string()]);
        assert!(outcome.decision.matched);

        config.nicknames.extra_table = Some(dir.path().join("missing.toml"));
        assert!(Screener::from_config(&config).is_err());
    }

    #[test]
    fn test_thresholds_from_config() {
        let mut config = ScreeningConfig::default();
        config.thresholds = Thresholds::new(100.0, 0.0);
        let screener = Screener::from_config(&config).unwrap();
        // "jon smith" is close but not exact, so it is escalated and the
        // missing oracle turns that into a conservative non-match
        let outcome = screener.screen_names("John Smith", vec!["jon smith".to_string()]);
        assert_eq!(outcome.decision.method, MatchMethod::LlmError);
    }
}
