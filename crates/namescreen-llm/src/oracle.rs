//! LLM-backed collaborators for the screening engine

use namescreen_core::{
    DisambiguationOracle, DisambiguationRequest, LlmConfig, LookupError, NicknameSource,
    OracleError, OracleReply, MAX_EXTERNAL_NICKNAMES,
};

use crate::prompts;
use crate::provider::{self, CompletionBackend, ProviderBackend};
use crate::types::{LLMError, LLMMessage, LLMRequest};

/// Resolved provider, model and credentials
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl LlmSettings {
    /// Resolve settings from config, reading the API key from the environment
    pub fn from_config(config: &LlmConfig) -> Result<Self, LLMError> {
        Self::resolve(config, |var| std::env::var(var).ok())
    }

    /// Like [`from_config`](Self::from_config) with an explicit variable lookup
    pub fn resolve(
        config: &LlmConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, LLMError> {
        let info = provider::get_provider(&config.provider).ok_or_else(|| {
            LLMError::ProviderNotFound {
                provider: config.provider.clone(),
            }
        })?;

        let model = if config.model.trim().is_empty() {
            info.default_model.to_string()
        } else {
            config.model.clone()
        };

        let env_var = if config.api_key_env.trim().is_empty() {
            info.api_key_env
        } else {
            config.api_key_env.as_str()
        };
        let api_key = match lookup(env_var).filter(|k| !k.trim().is_empty()) {
            Some(key) => key,
            None if info.requires_api_key => {
                return Err(LLMError::MissingApiKey {
                    env_var: env_var.to_string(),
                })
            }
            None => String::new(),
        };

        Ok(Self {
            provider: config.provider.clone(),
            model,
            api_key,
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
            timeout_seconds: Some(config.timeout_seconds),
        })
    }

    fn request(&self, messages: Vec<LLMMessage>) -> LLMRequest {
        LLMRequest {
            provider: self.provider.clone(),
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_seconds: self.timeout_seconds,
            api_key: self.api_key.clone(),
        }
    }
}

impl From<LLMError> for OracleError {
    fn from(e: LLMError) -> Self {
        if e.is_transient() {
            OracleError::Unavailable(e.to_string())
        } else {
            OracleError::Backend(e.to_string())
        }
    }
}

impl From<LLMError> for LookupError {
    fn from(e: LLMError) -> Self {
        LookupError::Unavailable(e.to_string())
    }
}

/// Settles uncertain comparisons by asking an LLM
pub struct LlmOracle<B = ProviderBackend> {
    settings: LlmSettings,
    backend: B,
}

impl LlmOracle<ProviderBackend> {
    pub fn new(settings: LlmSettings) -> Self {
        Self::with_backend(settings, ProviderBackend)
    }
}

impl<B: CompletionBackend> LlmOracle<B> {
    pub fn with_backend(settings: LlmSettings, backend: B) -> Self {
        Self { settings, backend }
    }
}

impl<B: CompletionBackend> DisambiguationOracle for LlmOracle<B> {
    fn disambiguate(&self, request: &DisambiguationRequest) -> Result<OracleReply, OracleError> {
        let llm_request = self.settings.request(prompts::disambiguation_messages(request));
        let response = self.backend.complete(&llm_request)?;

        tracing::debug!(
            model = %response.model,
            tokens = ?response.tokens_used,
            "disambiguation response received"
        );

        OracleReply::from_model_text(&response.content)
    }
}

/// Looks up nicknames of a first name with an LLM
pub struct LlmNicknameSource<B = ProviderBackend> {
    settings: LlmSettings,
    backend: B,
}

impl LlmNicknameSource<ProviderBackend> {
    pub fn new(settings: LlmSettings) -> Self {
        Self::with_backend(settings, ProviderBackend)
    }
}

impl<B: CompletionBackend> LlmNicknameSource<B> {
    pub fn with_backend(settings: LlmSettings, backend: B) -> Self {
        Self { settings, backend }
    }
}

impl<B: CompletionBackend> NicknameSource for LlmNicknameSource<B> {
    fn nicknames_for(&self, first_name: &str) -> Result<Vec<String>, LookupError> {
        let llm_request = self.settings.request(prompts::nickname_messages(first_name));
        let response = self.backend.complete(&llm_request)?;
        parse_nickname_list(&response.content)
    }
}

/// Parse the first JSON array of strings in a model reply
fn parse_nickname_list(text: &str) -> Result<Vec<String>, LookupError> {
    let json = match (text.find('['), text.rfind(']')) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => {
            return Err(LookupError::MalformedResponse(
                "no JSON array in response".to_string(),
            ))
        }
    };

    let names: Vec<String> =
        serde_json::from_str(json).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    Ok(names
        .into_iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .take(MAX_EXTERNAL_NICKNAMES)
        .collect())
}
