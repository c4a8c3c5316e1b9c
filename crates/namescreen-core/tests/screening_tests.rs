//! End-to-end screening tests
//!
//! Covers the reference scenarios, threshold boundaries, the oracle failure
//! policy and determinism/monotonicity properties.

mod common;

use common::stubs::{DownOracle, FixedOracle};
use namescreen_core::similarity::{self, FusionWeights};
use namescreen_core::variants::generate;
use namescreen_core::{
    Confidence, MatchDecider, MatchMethod, Screener, Thresholds, VariantSet,
};
use proptest::prelude::*;
use rstest::rstest;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn fused(a: &str, b: &str) -> f64 {
    FusionWeights::default().fuse(&similarity::score(a, b))
}

// === Reference scenarios ===

#[test]
fn test_scenario_exact_name() {
    let decider = MatchDecider::default();
    let d = decider.decide(&generate("John Smith"), &names(&["john smith"]), Thresholds::default());
    assert!(d.matched);
    assert_eq!(d.confidence, Confidence::High);
    assert_eq!(d.method, MatchMethod::FuzzyHighConfidence);
    assert_eq!(d.score, Some(100.0));
}

#[test]
fn test_scenario_nickname() {
    let variants = generate("William Johnson");
    assert!(variants.contains("bill johnson"));

    let d = MatchDecider::default().decide(&variants, &names(&["bill johnson"]), Thresholds::default());
    assert!(d.matched);
    assert_eq!(d.matched_variant.as_deref(), Some("bill johnson"));
    assert_eq!(d.confidence, Confidence::High);
}

#[test]
fn test_scenario_similar_but_different_person() {
    let variants = generate("Michael Brown");
    let article = names(&["michelle brown"]);

    let oracle = FixedOracle::new("no", "high");
    let decider = MatchDecider::new(&oracle);
    let d = decider.decide_for("Michael Brown", &variants, &article, Thresholds::default());

    let score = d.score.unwrap();
    assert!((20.0..85.0).contains(&score), "expected uncertain band, got {score}");
    assert_eq!(oracle.calls(), 1);
    assert!(!d.matched);
    assert_eq!(d.confidence, Confidence::High);
    assert_eq!(d.method, MatchMethod::LlmDisambiguation);
}

#[test]
fn test_scenario_empty_article() {
    let d = MatchDecider::default().decide(&generate("John Smith"), &[], Thresholds::default());
    assert!(!d.matched);
    assert_eq!(d.method, MatchMethod::NoData);
    assert_eq!(d.confidence, Confidence::High);
}

#[test]
fn test_unparseable_name_is_no_data() {
    let d = MatchDecider::default().decide(&generate("Madonna"), &names(&["madonna"]), Thresholds::default());
    assert_eq!(d.method, MatchMethod::NoData);
    assert!(!d.matched);
}

// === Threshold boundaries ===

#[test]
fn test_score_equal_to_high_is_match() {
    let variants: VariantSet = ["michael brown".to_string()].into_iter().collect();
    let s = fused("michael brown", "michelle brown");

    let oracle = FixedOracle::new("no", "high");
    let d = MatchDecider::new(&oracle).decide(&variants, &names(&["michelle brown"]), Thresholds::new(s, 10.0));
    assert!(d.matched);
    assert_eq!(d.method, MatchMethod::FuzzyHighConfidence);
    assert_eq!(oracle.calls(), 0);
}

#[test]
fn test_score_equal_to_low_is_escalated() {
    let variants: VariantSet = ["michael brown".to_string()].into_iter().collect();
    let s = fused("michael brown", "michelle brown");

    let oracle = FixedOracle::new("yes", "low");
    let d = MatchDecider::new(&oracle).decide(&variants, &names(&["michelle brown"]), Thresholds::new(95.0, s));
    assert_eq!(oracle.calls(), 1);
    assert!(d.matched);
    assert_eq!(d.method, MatchMethod::LlmDisambiguation);
    assert_eq!(d.confidence, Confidence::Low);
}

// === Oracle failure policy ===

#[test]
fn test_unreachable_oracle_is_conservative() {
    let decider = MatchDecider::new(DownOracle);
    let d = decider.decide(&generate("Michael Brown"), &names(&["michelle brown"]), Thresholds::default());
    assert!(!d.matched);
    assert_eq!(d.method, MatchMethod::LlmError);
    assert_eq!(d.confidence, Confidence::Low);
    assert!(d.explanation.contains("connection refused"));
}

// === Table-driven screening ===

#[rstest]
#[case("John Smith", "John Smith, a local businessman, was arrested.", true)]
#[case("William Johnson", "Bill Johnson announced his retirement.", true)]
#[case("Mary Elizabeth Anderson", "M.E. Anderson was promoted.", true)]
#[case("James Robert Wilson", "Robert Wilson testified in court.", true)]
#[case("Sarah Johnson-Smith", "Sarah Smith was quoted.", true)]
#[case("José María González", "Jose Gonzalez announced his candidacy.", true)]
#[case("John Smith", "Markets fell sharply on Monday morning.", false)]
fn test_screen_article(#[case] name: &str, #[case] article: &str, #[case] expected: bool) {
    let outcome = Screener::new().screen(name, article);
    assert_eq!(
        outcome.decision.matched, expected,
        "{name} vs {article:?}: {}",
        outcome.decision.explanation
    );
}

#[test]
fn test_screen_with_oracle_settles_uncertain_case() {
    let oracle = FixedOracle::new("yes", "medium");
    let screener = Screener::new().with_oracle(&oracle);
    let outcome = screener.screen("Michael Brown", "Michelle Brown won the award.");
    assert!(outcome.decision.matched);
    assert_eq!(outcome.decision.confidence, Confidence::Medium);
    assert_eq!(oracle.calls(), 1);
}

// === Properties ===

proptest! {
    #[test]
    fn test_decide_is_deterministic(
        name in "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}",
        article in "[a-z]{2,8} [a-z]{2,8}",
    ) {
        let oracle = FixedOracle::new("no", "high");
        let decider = MatchDecider::new(&oracle);
        let variants = generate(&name);
        let article = vec![article];
        let first = decider.decide(&variants, &article, Thresholds::default());
        let second = decider.decide(&variants, &article, Thresholds::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_raising_high_never_creates_fuzzy_match(
        name in "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}",
        article in "[a-z]{2,8} [a-z]{2,8}",
        high in 21.0f64..100.0,
        raise in 0.0f64..50.0,
    ) {
        let oracle = FixedOracle::new("no", "high");
        let decider = MatchDecider::new(&oracle);
        let variants = generate(&name);
        let article = vec![article];

        let lower = decider.decide(&variants, &article, Thresholds::new(high, 20.0));
        let raised = decider.decide(&variants, &article, Thresholds::new(high + raise, 20.0));

        let fuzzy_match = |d: &namescreen_core::MatchDecision| {
            d.matched && d.method == MatchMethod::FuzzyHighConfidence
        };
        if fuzzy_match(&raised) {
            prop_assert!(fuzzy_match(&lower));
        }
    }

    #[test]
    fn test_two_part_names_always_have_variants(
        first in "[A-Z][a-z]{2,8}",
        last in "[A-Z][a-z]{2,8}",
    ) {
        let variants = generate(&format!("{first} {last}"));
        let expected = format!("{} {}", first.to_lowercase(), last.to_lowercase());
        prop_assert!(variants.contains(&expected));
    }

    #[test]
    fn test_fused_score_in_range(a in "[a-z ]{0,20}", b in "[a-z ]{0,20}") {
        let s = fused(&a, &b);
        prop_assert!((0.0..=100.0).contains(&s));
    }
}
