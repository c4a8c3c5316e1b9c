//! Accuracy evaluation against labelled cases
//!
//! Runs a [`Screener`] over [`EvalCase`]s with known answers and reports
//! accuracy, precision, recall, F1, the confusion counts and a per-case-type
//! breakdown. [`synthetic_cases`] covers the common name-variation patterns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::batch::{self, ScreeningJob};
use crate::decision::MatchMethod;
use crate::screener::Screener;

/// A labelled screening case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    pub name: String,
    pub article_text: String,
    pub expected_match: bool,
    /// Grouping label, e.g. "nickname" or "false_positive"
    pub case_type: String,
    #[serde(default)]
    pub notes: String,
}

impl EvalCase {
    pub fn new(
        name: impl Into<String>,
        article_text: impl Into<String>,
        expected_match: bool,
        case_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            article_text: article_text.into(),
            expected_match,
            case_type: case_type.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Built-in cases, one per name-variation pattern
pub fn synthetic_cases() -> Vec<EvalCase> {
    vec![
        EvalCase::new(
            "John Smith",
            "John Smith, a local businessman, was arrested yesterday for fraud.",
            true,
            "exact_match",
        ),
        EvalCase::new(
            "William Johnson",
            "Bill Johnson announced his retirement from the company today.",
            true,
            "nickname",
        ),
        EvalCase::new(
            "Mary Elizabeth Anderson",
            "M.E. Anderson was promoted to senior vice president.",
            true,
            "initials",
        ),
        EvalCase::new(
            "James Robert Wilson",
            "Robert Wilson testified in court about the incident.",
            true,
            "middle_as_first",
        ),
        EvalCase::new(
            "Michael Brown",
            "Michelle Brown won the award for her outstanding research.",
            false,
            "false_positive",
        )
        .with_notes("similar first names, different people"),
        EvalCase::new(
            "Sarah Johnson-Smith",
            "Sarah Smith was quoted in the article about climate change.",
            true,
            "hyphenated",
        ),
        EvalCase::new(
            "José María González",
            "Jose Gonzalez announced his candidacy for mayor.",
            true,
            "cultural_variation",
        ),
    ]
}

/// Outcome of one evaluated case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: EvalCase,
    pub predicted_match: bool,
    pub correct: bool,
    pub method: MatchMethod,
    pub explanation: String,
    pub article_names: Vec<String>,
    pub variant_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseTypeStats {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Aggregate evaluation metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub overall_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub total_cases: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    pub case_type_breakdown: BTreeMap<String, CaseTypeStats>,
    pub results: Vec<CaseResult>,
}

impl EvalReport {
    /// Compute metrics from per-case results. Undefined ratios are 0.
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let count = |f: fn(&CaseResult) -> bool| results.iter().filter(|r| f(r)).count();

        let total = results.len();
        let correct = count(|r| r.correct);
        let tp = count(|r| r.predicted_match && r.case.expected_match);
        let fp = count(|r| r.predicted_match && !r.case.expected_match);
        let fn_ = count(|r| !r.predicted_match && r.case.expected_match);
        let tn = count(|r| !r.predicted_match && !r.case.expected_match);

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        let mut case_type_breakdown: BTreeMap<String, CaseTypeStats> = BTreeMap::new();
        for result in &results {
            let stats = case_type_breakdown.entry(result.case.case_type.clone()).or_default();
            stats.total += 1;
            if result.correct {
                stats.correct += 1;
            }
        }
        for stats in case_type_breakdown.values_mut() {
            stats.accuracy = ratio(stats.correct, stats.total);
        }

        Self {
            overall_accuracy: ratio(correct, total),
            precision,
            recall,
            f1_score,
            total_cases: total,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            true_negatives: tn,
            case_type_breakdown,
            results,
        }
    }

    /// Cases the screener got wrong
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.correct)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Runs labelled cases through a screener
pub struct Evaluator<'s, 'a> {
    screener: &'s Screener<'a>,
}

impl<'s, 'a> Evaluator<'s, 'a> {
    pub fn new(screener: &'s Screener<'a>) -> Self {
        Self { screener }
    }

    pub fn run(&self, cases: &[EvalCase]) -> EvalReport {
        let jobs: Vec<ScreeningJob> = cases
            .iter()
            .enumerate()
            .map(|(i, case)| ScreeningJob::new(i.to_string(), &case.name, &case.article_text))
            .collect();

        let results = batch::screen_batch(self.screener, &jobs)
            .into_iter()
            .zip(cases)
            .map(|(result, case)| {
                let decision = result.outcome.decision;
                let correct = decision.matched == case.expected_match;
                tracing::info!(
                    case_type = %case.case_type,
                    name = %case.name,
                    correct,
                    method = %decision.method,
                    "evaluated case"
                );
                CaseResult {
                    case: case.clone(),
                    predicted_match: decision.matched,
                    correct,
                    method: decision.method,
                    explanation: decision.explanation,
                    article_names: result.outcome.article_names,
                    variant_count: result.outcome.variants.len(),
                }
            })
            .collect();

        EvalReport::from_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(expected: bool, predicted: bool, case_type: &str) -> CaseResult {
        CaseResult {
            case: EvalCase::new("A B", "", expected, case_type),
            predicted_match: predicted,
            correct: expected == predicted,
            method: MatchMethod::FuzzyHighConfidence,
            explanation: String::new(),
            article_names: Vec::new(),
            variant_count: 0,
        }
    }

    #[test]
    fn test_metrics() {
        let report = EvalReport::from_results(vec![
            result(true, true, "a"),
            result(true, false, "a"),
            result(false, true, "b"),
            result(false, false, "b"),
        ]);
        assert_eq!(report.total_cases, 4);
        assert_eq!(report.true_positives, 1);
        assert_eq!(report.false_positives, 1);
        assert_eq!(report.false_negatives, 1);
        assert_eq!(report.true_negatives, 1);
        assert_eq!(report.overall_accuracy, 0.5);
        assert_eq!(report.precision, 0.5);
        assert_eq!(report.recall, 0.5);
        assert_eq!(report.f1_score, 0.5);
        assert_eq!(report.case_type_breakdown["a"].total, 2);
        assert_eq!(report.case_type_breakdown["a"].accuracy, 0.5);
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_empty_metrics() {
        let report = EvalReport::from_results(Vec::new());
        assert_eq!(report.total_cases, 0);
        assert_eq!(report.overall_accuracy, 0.0);
        assert_eq!(report.f1_score, 0.0);
    }

    #[test]
    fn test_synthetic_cases_cover_patterns() {
        let cases = synthetic_cases();
        assert_eq!(cases.len(), 7);
        assert_eq!(cases.iter().filter(|c| !c.expected_match).count(), 1);
    }

    #[test]
    fn test_synthetic_cases_all_correct() {
        let screener = Screener::new();
        let report = Evaluator::new(&screener).run(&synthetic_cases());
        let failures: Vec<_> = report.failures().map(|r| &r.case.case_type).collect();
        assert!(failures.is_empty(), "failed cases: {failures:?}");
        assert_eq!(report.overall_accuracy, 1.0);
        assert_eq!(report.true_negatives, 1);
    }
}
