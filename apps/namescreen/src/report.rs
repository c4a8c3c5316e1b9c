//! Screening and evaluation reports

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use namescreen_core::{
    Confidence, EvalReport, MatchDecision, ScreeningOutcome, SimilarityScores,
};
use serde::Serialize;

use crate::error::CliError;
use crate::OutputFormat;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub requires_manual_review: bool,
    pub risk_level: RiskLevel,
}

impl RiskAssessment {
    /// Only a confident non-match can be dismissed without review
    pub fn assess(decision: &MatchDecision) -> Self {
        let confident = decision.confidence == Confidence::High;
        let risk_level = match (decision.matched, confident) {
            (true, true) => RiskLevel::High,
            (false, true) => RiskLevel::Low,
            _ => RiskLevel::Medium,
        };
        Self {
            requires_manual_review: decision.matched || !confident,
            risk_level,
        }
    }

    fn summary(&self, matched: bool) -> &'static str {
        match (self.risk_level, matched) {
            (RiskLevel::High, _) => {
                "HIGH RISK - Strong indication this article refers to the target individual"
            }
            (RiskLevel::Medium, true) => "MEDIUM RISK - Possible match, manual review required",
            (RiskLevel::Medium, false) => "MEDIUM RISK - Uncertain, consider manual review",
            (RiskLevel::Low, _) => "LOW RISK - Article likely does not refer to target individual",
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchResult<'a> {
    match_found: bool,
    confidence: Confidence,
    method: &'static str,
    score: Option<f64>,
    matched_name: Option<&'a str>,
    matched_variant: Option<&'a str>,
    explanation: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalysisDetails<'a> {
    name_variants_generated: Vec<&'a str>,
    names_found_in_article: &'a [String],
    total_variants: usize,
    total_article_names: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    detailed_fuzzy_scores: Option<SimilarityScores>,
}

/// Everything shown for one screening run
#[derive(Debug, Serialize)]
pub struct ScreeningReport<'a> {
    analysis_timestamp: DateTime<Local>,
    target_name: &'a str,
    match_result: MatchResult<'a>,
    analysis_details: AnalysisDetails<'a>,
    risk_assessment: RiskAssessment,
}

impl<'a> ScreeningReport<'a> {
    pub fn new(outcome: &'a ScreeningOutcome) -> Self {
        Self::at(outcome, Local::now())
    }

    pub fn at(outcome: &'a ScreeningOutcome, analysis_timestamp: DateTime<Local>) -> Self {
        let decision = &outcome.decision;
        Self {
            analysis_timestamp,
            target_name: &outcome.target_name,
            match_result: MatchResult {
                match_found: decision.matched,
                confidence: decision.confidence,
                method: decision.method.as_str(),
                score: decision.score,
                matched_name: decision.matched_article_name.as_deref(),
                matched_variant: decision.matched_variant.as_deref(),
                explanation: &decision.explanation,
            },
            analysis_details: AnalysisDetails {
                name_variants_generated: outcome.variants.iter().map(String::as_str).collect(),
                names_found_in_article: &outcome.article_names,
                total_variants: outcome.variants.len(),
                total_article_names: outcome.article_names.len(),
                detailed_fuzzy_scores: decision.detailed_scores,
            },
            risk_assessment: RiskAssessment::assess(decision),
        }
    }

    pub fn risk(&self) -> &RiskAssessment {
        &self.risk_assessment
    }

    pub fn render(&self, format: OutputFormat, verbose: bool) -> Result<String, CliError> {
        match format {
            OutputFormat::Text => Ok(self.render_text(verbose)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn render_text(&self, verbose: bool) -> String {
        let result = &self.match_result;
        let details = &self.analysis_details;
        let mut lines = vec![
            "=".repeat(RULE_WIDTH),
            "ADVERSE MEDIA NAME SCREENING RESULT".to_string(),
            "=".repeat(RULE_WIDTH),
            format!("Target Name: {}", self.target_name),
            format!(
                "Analysis Date: {}",
                self.analysis_timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            String::new(),
        ];

        let status = if result.match_found { "MATCH FOUND" } else { "NO MATCH" };
        lines.push(format!("Result: {status}"));
        lines.push(format!("Confidence: {}", result.confidence.as_str().to_uppercase()));
        lines.push(format!("Method: {}", title_case(result.method)));
        if let Some(score) = result.score {
            lines.push(format!("Match Score: {score:.1}/100"));
        }
        lines.push(String::new());

        if let (true, Some(name)) = (result.match_found, result.matched_name) {
            lines.push("Match Details:".to_string());
            lines.push(format!("  - Matched Name in Article: '{name}'"));
            if let Some(variant) = result.matched_variant {
                lines.push(format!("  - Matched Name Variant: '{variant}'"));
            }
        }

        lines.push("Explanation:".to_string());
        lines.push(format!("  {}", result.explanation));
        lines.push(String::new());

        if verbose {
            lines.push("Detailed Analysis:".to_string());
            lines.push("-".repeat(30));
            lines.push(format!("Name Variants Generated ({}):", details.total_variants));
            lines.extend(details.name_variants_generated.iter().map(|v| format!("  - {v}")));
            lines.push(String::new());

            lines.push(format!("Names Found in Article ({}):", details.total_article_names));
            if details.names_found_in_article.is_empty() {
                lines.push("  - No names detected".to_string());
            }
            lines.extend(details.names_found_in_article.iter().map(|n| format!("  - {n}")));
            lines.push(String::new());

            if let Some(scores) = &details.detailed_fuzzy_scores {
                lines.push("Detailed Fuzzy Match Scores:".to_string());
                for (label, value) in [
                    ("Ratio", scores.ratio),
                    ("Partial Ratio", scores.partial_ratio),
                    ("Token Sort Ratio", scores.token_sort_ratio),
                    ("Token Set Ratio", scores.token_set_ratio),
                ] {
                    lines.push(format!("  - {label}: {value:.1}"));
                }
                lines.push(String::new());
            }
        }

        let risk = &self.risk_assessment;
        lines.push("Risk Assessment:".to_string());
        lines.push(format!("  {}", risk.summary(result.match_found)));
        lines.push(String::new());
        lines.push("Recommendation:".to_string());
        let (action, reason) = if risk.requires_manual_review {
            (
                "MANUAL REVIEW RECOMMENDED",
                "An analyst should verify this result for regulatory compliance.",
            )
        } else {
            (
                "ARTICLE CAN LIKELY BE DISMISSED",
                "Low probability of referring to target individual.",
            )
        };
        lines.push(format!("  {action}"));
        lines.push(format!("     {reason}"));

        lines.join("\n")
    }
}

/// "fuzzy_high_confidence" -> "Fuzzy High Confidence"
fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_evaluation(report: &EvalReport, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(evaluation_text(report)),
    }
}

fn evaluation_text(report: &EvalReport) -> String {
    let mut lines = vec![
        "=".repeat(60),
        "NAME SCREENING EVALUATION RESULTS".to_string(),
        "=".repeat(60),
        format!("Overall Accuracy: {:.2}%", report.overall_accuracy * 100.0),
        format!("Precision: {:.2}%", report.precision * 100.0),
        format!("Recall: {:.2}%", report.recall * 100.0),
        format!("F1 Score: {:.2}%", report.f1_score * 100.0),
        String::new(),
        "Confusion Matrix:".to_string(),
        format!("True Positives: {}", report.true_positives),
        format!("False Positives: {}", report.false_positives),
        format!("False Negatives: {}", report.false_negatives),
        format!("True Negatives: {}", report.true_negatives),
        String::new(),
        "Results by Case Type:".to_string(),
    ];

    for (case_type, stats) in &report.case_type_breakdown {
        lines.push(format!(
            "  {case_type}: {}/{} ({:.2}%)",
            stats.correct,
            stats.total,
            stats.accuracy * 100.0
        ));
    }
    lines.push(String::new());

    lines.push("Detailed Results:".to_string());
    for (i, result) in report.results.iter().enumerate() {
        let mark = if result.correct { "PASS" } else { "FAIL" };
        lines.push(format!(
            "{mark} Case {} ({}): '{}' -> Expected: {}, Predicted: {} (Method: {})",
            i + 1,
            result.case.case_type,
            result.case.name,
            result.case.expected_match,
            result.predicted_match,
            result.method
        ));
        if !result.correct {
            lines.push(format!("    Explanation: {}", result.explanation));
            lines.push(format!("    Article names found: {:?}", result.article_names));
        }
    }

    lines.join("\n")
}

/// Write a rendered report, adding the format's extension when missing
pub fn save(content: &str, path: &Path, format: OutputFormat) -> Result<PathBuf, CliError> {
    let extension = match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
    };
    let path = if path.extension().is_some_and(|e| e == extension) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    };

    std::fs::write(&path, content).map_err(|e| CliError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}
