//! Tiered match decisions
//!
//! Every (variant, article name) pair is scored; the best pair is classified
//! by its fused score into one of three tiers:
//!
//! - **Match**: `score >= high`, a confident fuzzy match
//! - **NoMatch**: `score < low`, confidently dissimilar
//! - **Escalate**: anything in between, settled by one request to a
//!   [`DisambiguationOracle`]
//!
//! Oracle failures never surface as errors: they become a conservative
//! low-confidence non-match tagged `llm_error`.

mod explain;
mod oracle;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use oracle::{DisambiguationOracle, DisambiguationRequest, NoOracle, OracleLimits, OracleReply};

use crate::similarity::{self, FusionWeights, SimilarityScores};
use crate::variants::VariantSet;

/// Score thresholds for the three-way decision, on the 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores at or above this are a match
    pub high: f64,
    /// Scores strictly below this are a confident non-match
    pub low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 85.0,
            low: 20.0,
        }
    }
}

impl Thresholds {
    pub fn new(high: f64, low: f64) -> Self {
        Self { high, low }
    }
}

/// How a decision was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    FuzzyHighConfidence,
    LlmDisambiguation,
    LlmError,
    NoData,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::FuzzyHighConfidence => "fuzzy_high_confidence",
            MatchMethod::LlmDisambiguation => "llm_disambiguation",
            MatchMethod::LlmError => "llm_error",
            MatchMethod::NoData => "no_data",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence attached to a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Parse "high" / "medium" / "low", case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" | "med" | "moderate" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub variant: String,
    pub article_name: String,
    pub scores: SimilarityScores,
    pub fused: f64,
}

/// Result of screening one name against one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub matched: bool,
    pub method: MatchMethod,
    pub confidence: Confidence,
    pub matched_variant: Option<String>,
    pub matched_article_name: Option<String>,
    /// Fused score of the best pair, absent when there was nothing to compare
    pub score: Option<f64>,
    pub detailed_scores: Option<SimilarityScores>,
    pub explanation: String,
}

impl MatchDecision {
    fn from_pair(
        best: &ScorePair,
        matched: bool,
        method: MatchMethod,
        confidence: Confidence,
        explanation: String,
    ) -> Self {
        Self {
            matched,
            method,
            confidence,
            matched_variant: Some(best.variant.clone()),
            matched_article_name: Some(best.article_name.clone()),
            score: Some(best.fused),
            detailed_scores: Some(best.scores),
            explanation,
        }
    }

    fn no_data(no_variants: bool, no_article_names: bool) -> Self {
        Self {
            matched: false,
            method: MatchMethod::NoData,
            confidence: Confidence::High,
            matched_variant: None,
            matched_article_name: None,
            score: None,
            detailed_scores: None,
            explanation: explain::no_data(no_variants, no_article_names),
        }
    }
}

/// Three-way classification of a fused score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Match,
    NoMatch,
    Escalate,
}

impl Tier {
    pub fn classify(score: f64, thresholds: &Thresholds) -> Self {
        if score >= thresholds.high {
            Tier::Match
        } else if score < thresholds.low {
            Tier::NoMatch
        } else {
            Tier::Escalate
        }
    }
}

/// Scores variants against article names and renders a tiered decision
pub struct MatchDecider<O = NoOracle> {
    oracle: O,
    weights: FusionWeights,
    limits: OracleLimits,
}

impl Default for MatchDecider<NoOracle> {
    fn default() -> Self {
        Self::new(NoOracle)
    }
}

impl<O: DisambiguationOracle> MatchDecider<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            weights: FusionWeights::default(),
            limits: OracleLimits::default(),
        }
    }

    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_limits(mut self, limits: OracleLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn weights(&self) -> &FusionWeights {
        &self.weights
    }

    pub fn limits(&self) -> &OracleLimits {
        &self.limits
    }

    /// Decide whether any article name refers to the person behind `variants`
    pub fn decide(
        &self,
        variants: &VariantSet,
        article_names: &[String],
        thresholds: Thresholds,
    ) -> MatchDecision {
        self.decide_for("", variants, article_names, thresholds)
    }

    /// Like [`decide`](Self::decide), passing the original target name on to the oracle
    pub fn decide_for(
        &self,
        target_name: &str,
        variants: &VariantSet,
        article_names: &[String],
        thresholds: Thresholds,
    ) -> MatchDecision {
        if variants.is_empty() || article_names.is_empty() {
            return MatchDecision::no_data(variants.is_empty(), article_names.is_empty());
        }

        let table = ScoreTable::build(variants, article_names, &self.weights);
        let best = &table.best;
        let tier = Tier::classify(best.fused, &thresholds);

        tracing::debug!(
            variant = %best.variant,
            article_name = %best.article_name,
            score = best.fused,
            ?tier,
            "best pair"
        );

        match tier {
            Tier::Match => MatchDecision::from_pair(
                best,
                true,
                MatchMethod::FuzzyHighConfidence,
                Confidence::High,
                explain::fuzzy_match(best, thresholds.high),
            ),
            Tier::NoMatch => MatchDecision::from_pair(
                best,
                false,
                MatchMethod::FuzzyHighConfidence,
                Confidence::High,
                explain::fuzzy_no_match(best, thresholds.low),
            ),
            Tier::Escalate => {
                let request = table.request(target_name, &self.limits);
                self.escalate(best, &request)
            }
        }
    }

    fn escalate(&self, best: &ScorePair, request: &DisambiguationRequest) -> MatchDecision {
        let failed = |error: String| {
            tracing::warn!(score = best.fused, "disambiguation failed: {}", error);
            MatchDecision::from_pair(
                best,
                false,
                MatchMethod::LlmError,
                Confidence::Low,
                explain::oracle_failed(best, &error),
            )
        };

        let reply = match self.oracle.disambiguate(request) {
            Ok(reply) => reply,
            Err(e) => return failed(e.to_string()),
        };

        let Some(matched) = reply.verdict() else {
            return failed(format!("unrecognised verdict '{}'", reply.verdict));
        };

        let confidence = reply
            .confidence
            .as_deref()
            .and_then(Confidence::parse)
            .unwrap_or(Confidence::Medium);

        MatchDecision::from_pair(
            best,
            matched,
            MatchMethod::LlmDisambiguation,
            confidence,
            explain::disambiguated(best, matched, confidence, reply.reasoning.as_deref()),
        )
    }
}

/// All pair scores for one decision, reduced to what the decider needs
struct ScoreTable {
    best: ScorePair,
    /// (variant, best fused score) in variant order
    variant_best: Vec<(String, f64)>,
    /// (article name, best fused score) in first-seen order, duplicates merged
    name_best: Vec<(String, f64)>,
}

impl ScoreTable {
    /// Score every pair. Iteration is variant order, then article-name order;
    /// the first pair seen keeps the lead on exact ties.
    fn build(variants: &VariantSet, article_names: &[String], weights: &FusionWeights) -> Self {
        let mut best: Option<ScorePair> = None;
        let mut variant_best = Vec::with_capacity(variants.len());
        let mut name_best: Vec<(String, f64)> = Vec::new();

        for variant in variants {
            let mut variant_top = 0.0_f64;
            for article_name in article_names {
                let scores = similarity::score(variant, article_name);
                let fused = weights.fuse(&scores);
                variant_top = variant_top.max(fused);

                match name_best.iter_mut().find(|(n, _)| n == article_name) {
                    Some((_, top)) => *top = top.max(fused),
                    None => name_best.push((article_name.clone(), fused)),
                }

                if best.as_ref().map_or(true, |b| fused > b.fused) {
                    best = Some(ScorePair {
                        variant: variant.clone(),
                        article_name: article_name.clone(),
                        scores,
                        fused,
                    });
                }
            }
            variant_best.push((variant.clone(), variant_top));
        }

        // Both inputs are non-empty, so at least one pair was scored.
        let best = best.unwrap_or_else(|| ScorePair {
            variant: String::new(),
            article_name: String::new(),
            scores: similarity::score("", ""),
            fused: 0.0,
        });

        Self {
            best,
            variant_best,
            name_best,
        }
    }

    fn request(&self, target_name: &str, limits: &OracleLimits) -> DisambiguationRequest {
        DisambiguationRequest {
            target_name: target_name.to_string(),
            candidate_variants: top_n(&self.variant_best, limits.max_variants),
            candidate_article_names: top_n(&self.name_best, limits.max_article_names),
            fused_score: self.best.fused,
            best_variant: self.best.variant.clone(),
            best_article_name: self.best.article_name.clone(),
        }
    }
}

/// Highest-scoring entries first; stable, so ties keep input order
fn top_n(entries: &[(String, f64)], n: usize) -> Vec<String> {
    let mut ranked: Vec<&(String, f64)> = entries.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(s, _)| s.clone()).collect()
}
