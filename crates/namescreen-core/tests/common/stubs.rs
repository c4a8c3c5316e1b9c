//! Deterministic collaborators for integration tests

use std::sync::atomic::{AtomicUsize, Ordering};

use namescreen_core::{
    DisambiguationOracle, DisambiguationRequest, LookupError, NicknameSource, OracleError,
    OracleReply,
};

/// Always answers with the same verdict, counting calls
pub struct FixedOracle {
    reply: OracleReply,
    calls: AtomicUsize,
}

impl FixedOracle {
    pub fn new(verdict: &str, confidence: &str) -> Self {
        Self {
            reply: OracleReply::new(verdict, confidence, "fixed test verdict"),
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DisambiguationOracle for FixedOracle {
    fn disambiguate(&self, _request: &DisambiguationRequest) -> Result<OracleReply, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Always fails, as an unreachable backend would
#[allow(dead_code)]
pub struct DownOracle;

impl DisambiguationOracle for DownOracle {
    fn disambiguate(&self, _request: &DisambiguationRequest) -> Result<OracleReply, OracleError> {
        Err(OracleError::Backend("connection refused".to_string()))
    }
}

/// Nickname source with a fixed answer for every first name
#[allow(dead_code)]
pub struct FixedNicknames(pub Result<Vec<String>, LookupError>);

impl NicknameSource for FixedNicknames {
    fn nicknames_for(&self, _first_name: &str) -> Result<Vec<String>, LookupError> {
        self.0.clone()
    }
}
