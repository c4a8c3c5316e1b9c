//! Error types for the namescreen CLI

use namescreen_core::{ConfigError, TableError};
use namescreen_llm::LLMError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Article file is empty: {0}")]
    EmptyArticle(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("LLM setup failed: {0}")]
    Llm(#[from] LLMError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
