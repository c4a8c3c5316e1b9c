//! namescreen-llm - LLM collaborators for namescreen
//!
//! Connects the screening engine's two external seams to chat-completion
//! providers through the graniet/llm library:
//!
//! - [`LlmOracle`] implements [`DisambiguationOracle`](namescreen_core::DisambiguationOracle)
//!   for scores in the uncertain band
//! - [`LlmNicknameSource`] implements [`NicknameSource`](namescreen_core::NicknameSource)
//!   for nicknames the built-in table lacks
//!
//! # Supported Providers
//!
//! Groq, OpenAI, Anthropic, Mistral, Cohere, DeepSeek, xAI, HuggingFace and a
//! local Ollama server. See [`get_providers`].
//!
//! All operations are blocking. Async clients run on a shared tokio runtime.

pub mod oracle;
pub mod prompts;
pub mod provider;
pub mod types;

pub use oracle::{LlmNicknameSource, LlmOracle, LlmSettings};
pub use provider::{complete_sync, get_provider, get_providers, CompletionBackend, ProviderBackend};
pub use types::*;
