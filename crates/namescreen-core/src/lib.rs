//! namescreen-core: adverse-media name screening
//!
//! Decides whether a person named in a news article is the same person as a
//! screening target. The pipeline has three stages:
//!
//! - [`variants`]: expand the target's canonical name into its likely
//!   surface forms (nicknames, initials, middle name as first name, ...)
//! - [`similarity`]: score every variant against every person name found in
//!   the article with four string metrics fused into one 0-100 score
//! - [`decision`]: classify the best score as a match, a non-match, or an
//!   uncertain case settled by one [`DisambiguationOracle`] request
//!
//! [`Screener`] wires the stages together with a [`NameExtractor`] for raw
//! article text.
//!
//! ```
//! use namescreen_core::Screener;
//!
//! let outcome = Screener::new().screen(
//!     "William Johnson",
//!     "Bill Johnson announced his retirement from the company today.",
//! );
//! assert!(outcome.decision.matched);
//! ```

pub mod batch;
pub mod config;
pub mod decision;
pub mod error;
pub mod evaluation;
pub mod extract;
pub mod screener;
pub mod similarity;
pub mod variants;

pub use batch::{screen_batch, BatchResult, ScreeningJob};
pub use config::{LlmConfig, NicknameConfig, ScreeningConfig};
pub use decision::{
    Confidence, DisambiguationOracle, DisambiguationRequest, MatchDecider, MatchDecision,
    MatchMethod, NoOracle, OracleLimits, OracleReply, ScorePair, Thresholds, Tier,
};
pub use error::{ConfigError, LookupError, OracleError, TableError};
pub use evaluation::{synthetic_cases, EvalCase, EvalReport, Evaluator};
pub use extract::{HeuristicExtractor, NameExtractor};
pub use screener::{ScreeningOutcome, Screener};
pub use similarity::{FusionWeights, SimilarityScores};
pub use variants::{
    NicknameSource, NicknameTable, VariantGenerator, VariantSet, MAX_EXTERNAL_NICKNAMES,
};
