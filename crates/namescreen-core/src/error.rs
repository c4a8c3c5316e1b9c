//! Error types for namescreen-core
//!
//! Screening itself never fails: `generate`, `decide` and `screen` always
//! return a value. These errors cover the fallible edges around the engine
//! (configuration, data files, collaborators).

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Threshold values are invalid relative to each other
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Errors loading an external nickname table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("TOML parse error: {0}")]
    Parse(String),
}

/// Errors reported by a disambiguation oracle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// No oracle is configured or the backend could not be reached
    #[error("Disambiguation oracle unavailable: {0}")]
    Unavailable(String),

    /// The backend answered but the answer could not be parsed
    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    /// The backend returned an error
    #[error("Oracle backend error: {0}")]
    Backend(String),
}

/// Errors reported by a nickname lookup collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Nickname lookup unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed nickname response: {0}")]
    MalformedResponse(String),
}
