//! Disambiguation oracle contract
//!
//! When the best fuzzy score falls between the low and high thresholds the
//! decider asks an external oracle (typically an LLM) once. The oracle sees a
//! capped list of candidates and answers with a yes/no verdict, a confidence
//! and free-text reasoning.

use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// What the oracle is told about an uncertain comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisambiguationRequest {
    /// The name being screened, as given by the caller (may be empty)
    pub target_name: String,
    /// Best-scoring variants, highest first
    pub candidate_variants: Vec<String>,
    /// Best-scoring article names, highest first
    pub candidate_article_names: Vec<String>,
    pub fused_score: f64,
    pub best_variant: String,
    pub best_article_name: String,
}

/// The oracle's answer, before interpretation.
///
/// Fields are kept as loose strings so a partially malformed reply can still
/// be interpreted: an unknown confidence falls back to medium, an unknown
/// verdict is treated as an oracle failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleReply {
    #[serde(alias = "match", alias = "answer")]
    pub verdict: String,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default, alias = "explanation", alias = "reason")]
    pub reasoning: Option<String>,
}

impl OracleReply {
    pub fn new(verdict: impl Into<String>, confidence: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            verdict: verdict.into(),
            confidence: Some(confidence.into()),
            reasoning: Some(reasoning.into()),
        }
    }

    /// Parse a reply out of free model text.
    ///
    /// Takes the outermost `{ ... }` span so replies wrapped in prose or code
    /// fences still parse.
    pub fn from_model_text(text: &str) -> Result<Self, OracleError> {
        let start = text.find('{');
        let end = text.rfind('}');
        let json = match (start, end) {
            (Some(s), Some(e)) if s < e => &text[s..=e],
            _ => {
                return Err(OracleError::MalformedResponse(format!(
                    "no JSON object in response: {}",
                    truncate(text, 120)
                )))
            }
        };

        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        // Models sometimes answer `"match": true` instead of a string verdict
        let value = match value {
            serde_json::Value::Object(mut map) => {
                for key in ["verdict", "match", "answer"] {
                    if let Some(serde_json::Value::Bool(b)) = map.get(key) {
                        let verdict = if *b { "yes" } else { "no" };
                        map.insert(key.to_string(), serde_json::Value::String(verdict.to_string()));
                    }
                }
                serde_json::Value::Object(map)
            }
            other => other,
        };

        serde_json::from_value(value).map_err(|e| OracleError::MalformedResponse(e.to_string()))
    }

    /// `Some(true)` for yes, `Some(false)` for no, `None` if unrecognised
    pub fn verdict(&self) -> Option<bool> {
        match self.verdict.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "match" | "same" => Some(true),
            "no" | "n" | "false" | "no match" | "no_match" | "different" => Some(false),
            _ => None,
        }
    }
}

/// External disambiguation collaborator
pub trait DisambiguationOracle: Send + Sync {
    fn disambiguate(&self, request: &DisambiguationRequest) -> Result<OracleReply, OracleError>;
}

/// Oracle used when none is configured; every request fails as unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

impl DisambiguationOracle for NoOracle {
    fn disambiguate(&self, _request: &DisambiguationRequest) -> Result<OracleReply, OracleError> {
        Err(OracleError::Unavailable("no disambiguation oracle configured".to_string()))
    }
}

impl<T: DisambiguationOracle + ?Sized> DisambiguationOracle for &T {
    fn disambiguate(&self, request: &DisambiguationRequest) -> Result<OracleReply, OracleError> {
        (**self).disambiguate(request)
    }
}

impl<T: DisambiguationOracle + ?Sized> DisambiguationOracle for Box<T> {
    fn disambiguate(&self, request: &DisambiguationRequest) -> Result<OracleReply, OracleError> {
        (**self).disambiguate(request)
    }
}

/// Caps on how many candidates are sent to the oracle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleLimits {
    pub max_variants: usize,
    pub max_article_names: usize,
}

impl Default for OracleLimits {
    fn default() -> Self {
        Self {
            max_variants: 10,
            max_article_names: 20,
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
