//! Request, response and error types for LLM completions

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role of the message sender
    pub role: LLMRole,
    /// Text content of the message
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::User,
            content: content.into(),
        }
    }
}

/// Request to complete a conversation
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Provider identifier (e.g., "groq", "openai", "mistral")
    pub provider: String,
    /// Model identifier (e.g., "llama-3.3-70b-versatile")
    pub model: String,
    /// Conversation messages
    pub messages: Vec<LLMMessage>,
    /// Maximum tokens to generate (optional)
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0-2.0, optional)
    pub temperature: Option<f32>,
    /// HTTP timeout for the whole request (optional)
    pub timeout_seconds: Option<u64>,
    /// API key for the provider
    pub api_key: String,
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,
    /// Number of tokens used in completion
    pub tokens_used: Option<u32>,
    /// Model that generated the response
    pub model: String,
}

/// Information about a supported provider
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Unique identifier for the provider
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Default model for this provider
    pub default_model: &'static str,
    /// Environment variable conventionally holding the API key
    pub api_key_env: &'static str,
    /// Whether the provider requires an API key
    pub requires_api_key: bool,
}

/// Error types for LLM operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LLMError {
    #[error("Provider not found: {provider}")]
    ProviderNotFound { provider: String },

    #[error("Missing API key: set {env_var}")]
    MissingApiKey { env_var: String },

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited: retry after {retry_after_seconds:?} seconds")]
    RateLimited { retry_after_seconds: Option<u32> },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Context length exceeded: {message}")]
    ContextLengthExceeded { message: String },

    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl LLMError {
    /// Whether the failure is likely transient (worth retrying later)
    pub fn is_transient(&self) -> bool {
        matches!(self, LLMError::RateLimited { .. } | LLMError::NetworkError { .. })
    }
}
