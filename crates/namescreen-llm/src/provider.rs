//! Provider implementations wrapping graniet/llm backends
//!
//! All calls are blocking: the async client runs on a process-wide tokio
//! runtime, so callers (including rayon workers) never need one of their own.

use std::sync::OnceLock;

use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use tokio::runtime::Runtime;

use crate::types::*;

// ============================================================================
// Tokio Runtime for blocking calls
// ============================================================================

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or create the tokio runtime used for blocking calls
fn get_runtime() -> Result<&'static Runtime, LLMError> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Runtime::new().map_err(|e| LLMError::Runtime {
        message: e.to_string(),
    })?;
    // Another thread may have won the race; either runtime will do.
    let _ = RUNTIME.set(runtime);
    RUNTIME.get().ok_or_else(|| LLMError::Runtime {
        message: "runtime initialisation failed".to_string(),
    })
}

// ============================================================================
// Provider Registry
// ============================================================================

const PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "groq",
        name: "Groq",
        default_model: "llama-3.3-70b-versatile",
        api_key_env: "GROQ_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "openai",
        name: "OpenAI",
        default_model: "gpt-4o-mini",
        api_key_env: "OPENAI_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "anthropic",
        name: "Anthropic",
        default_model: "claude-3-5-haiku-latest",
        api_key_env: "ANTHROPIC_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "mistral",
        name: "Mistral AI",
        default_model: "mistral-large-latest",
        api_key_env: "MISTRAL_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "cohere",
        name: "Cohere",
        default_model: "command-r-plus",
        api_key_env: "COHERE_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "deepseek",
        name: "DeepSeek",
        default_model: "deepseek-chat",
        api_key_env: "DEEPSEEK_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "xai",
        name: "xAI (Grok)",
        default_model: "grok-beta",
        api_key_env: "XAI_API_KEY",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "huggingface",
        name: "HuggingFace Inference",
        default_model: "meta-llama/Meta-Llama-3-8B-Instruct",
        api_key_env: "HF_TOKEN",
        requires_api_key: true,
    },
    ProviderInfo {
        id: "ollama",
        name: "Ollama",
        default_model: "llama3.1",
        api_key_env: "OLLAMA_API_KEY",
        requires_api_key: false,
    },
];

/// All supported providers
pub fn get_providers() -> &'static [ProviderInfo] {
    PROVIDERS
}

/// Look up a provider by ID
pub fn get_provider(provider: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS.iter().find(|p| p.id == provider)
}

// ============================================================================
// Completion Implementation
// ============================================================================

/// Map our provider ID to llm backend
fn get_backend(provider: &str) -> Result<LLMBackend, LLMError> {
    match provider {
        "groq" => Ok(LLMBackend::Groq),
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "mistral" => Ok(LLMBackend::Mistral),
        "cohere" => Ok(LLMBackend::Cohere),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        "xai" => Ok(LLMBackend::XAI),
        "huggingface" => Ok(LLMBackend::HuggingFace),
        "ollama" => Ok(LLMBackend::Ollama),
        _ => Err(LLMError::ProviderNotFound {
            provider: provider.to_string(),
        }),
    }
}

/// Executes completion requests
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError>;
}

impl<T: CompletionBackend + ?Sized> CompletionBackend for &T {
    fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError> {
        (**self).complete(request)
    }
}

/// The real backend: graniet/llm over the shared runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderBackend;

impl CompletionBackend for ProviderBackend {
    fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError> {
        complete_sync(request)
    }
}

/// Execute a completion request (blocking wrapper around async)
pub fn complete_sync(request: &LLMRequest) -> Result<LLMResponse, LLMError> {
    let runtime = get_runtime()?;
    runtime.block_on(complete_async(request))
}

/// Execute a completion request (async)
async fn complete_async(request: &LLMRequest) -> Result<LLMResponse, LLMError> {
    let backend = get_backend(&request.provider)?;

    let mut builder = LLMBuilder::new()
        .backend(backend)
        .api_key(&request.api_key)
        .model(&request.model);

    if let Some(max_tokens) = request.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(temp) = request.temperature {
        builder = builder.temperature(temp);
    }
    if let Some(timeout) = request.timeout_seconds {
        builder = builder.timeout_seconds(timeout);
    }

    let llm = builder
        .build()
        .map_err(|e: llm::error::LLMError| LLMError::InvalidRequest {
            message: e.to_string(),
        })?;

    let chat_messages = to_chat_messages(&request.messages);

    tracing::debug!(
        provider = %request.provider,
        model = %request.model,
        messages = chat_messages.len(),
        "sending completion request"
    );

    let response = llm
        .chat(&chat_messages)
        .await
        .map_err(|e: llm::error::LLMError| classify_error(&e.to_string()))?;

    let content = response.text().unwrap_or_default().to_string();
    let tokens_used = response.usage().map(|u| u.total_tokens as u32);

    Ok(LLMResponse {
        content,
        tokens_used,
        model: request.model.clone(),
    })
}

/// Convert messages; the chat API has no system role, so a system message is
/// prepended to the next user message.
fn to_chat_messages(messages: &[LLMMessage]) -> Vec<ChatMessage> {
    let mut chat_messages = Vec::new();
    let mut system_prompt = None;

    for msg in messages {
        match msg.role {
            LLMRole::System => {
                system_prompt = Some(msg.content.clone());
            }
            LLMRole::User => {
                let content = merge_system(system_prompt.take(), &msg.content);
                chat_messages.push(ChatMessage::user().content(&content).build());
            }
            LLMRole::Assistant => {
                chat_messages.push(ChatMessage::assistant().content(&msg.content).build());
            }
        }
    }

    if chat_messages.is_empty() {
        if let Some(sys) = system_prompt {
            chat_messages.push(ChatMessage::user().content(&sys).build());
        }
    }

    chat_messages
}

fn merge_system(system_prompt: Option<String>, content: &str) -> String {
    match system_prompt {
        Some(sys) => format!("{}\n\n{}", sys, content),
        None => content.to_string(),
    }
}

/// Map a provider error message onto our error kinds
fn classify_error(message: &str) -> LLMError {
    let err_str = message.to_lowercase();
    if err_str.contains("rate limit") || err_str.contains("429") {
        LLMError::RateLimited {
            retry_after_seconds: Some(60),
        }
    } else if err_str.contains("unauthorized")
        || err_str.contains("401")
        || err_str.contains("invalid api key")
        || err_str.contains("invalid_api_key")
    {
        LLMError::InvalidApiKey
    } else if err_str.contains("network")
        || err_str.contains("connection")
        || err_str.contains("timed out")
        || err_str.contains("timeout")
    {
        LLMError::NetworkError {
            message: message.to_string(),
        }
    } else if err_str.contains("context") && err_str.contains("length") {
        LLMError::ContextLengthExceeded {
            message: message.to_string(),
        }
    } else {
        LLMError::ApiError {
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_registry() {
        let providers = get_providers();
        assert!(!providers.is_empty());
        assert!(providers.iter().any(|p| p.id == "groq"));
        assert_eq!(get_provider("groq").unwrap().api_key_env, "GROQ_API_KEY");
        assert!(!get_provider("ollama").unwrap().requires_api_key);
        assert!(get_provider("unknown").is_none());
    }

    #[test]
    fn test_backend_mapping() {
        for provider in get_providers() {
            assert!(get_backend(provider.id).is_ok(), "{} has no backend", provider.id);
        }
        assert!(matches!(
            get_backend("unknown"),
            Err(LLMError::ProviderNotFound { .. })
        ));
    }

    #[test]
    fn test_classify_error() {
        assert!(matches!(
            classify_error("HTTP 429 Too Many Requests"),
            LLMError::RateLimited { .. }
        ));
        assert_eq!(classify_error("401 Unauthorized"), LLMError::InvalidApiKey);
        assert!(matches!(
            classify_error("connection reset by peer"),
            LLMError::NetworkError { .. }
        ));
        assert!(matches!(
            classify_error("operation timeout"),
            LLMError::NetworkError { .. }
        ));
        assert!(matches!(
            classify_error("maximum context length is 8192 tokens"),
            LLMError::ContextLengthExceeded { .. }
        ));
        assert!(matches!(classify_error("boom"), LLMError::ApiError { .. }));
    }

    #[test]
    fn test_system_prompt_merged_into_user_message() {
        assert_eq!(merge_system(Some("sys".into()), "user"), "sys\n\nuser");
        assert_eq!(merge_system(None, "user"), "user");

        let messages = vec![LLMMessage::system("sys"), LLMMessage::user("user")];
        assert_eq!(to_chat_messages(&messages).len(), 1);
        assert_eq!(to_chat_messages(&[LLMMessage::system("only")]).len(), 1);
    }
}
