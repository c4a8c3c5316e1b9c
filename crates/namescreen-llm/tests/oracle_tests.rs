//! LLM collaborators driven by canned completions

use std::sync::Mutex;

use namescreen_core::{
    Confidence, LlmConfig, MatchMethod, NicknameSource, Screener, VariantGenerator,
};
use namescreen_llm::{
    CompletionBackend, LLMError, LLMRequest, LLMResponse, LLMRole, LlmNicknameSource, LlmOracle,
    LlmSettings,
};
use rstest::rstest;

/// Replies with fixed text and remembers the last request
struct Canned {
    reply: Result<String, LLMError>,
    last: Mutex<Option<LLMRequest>>,
}

impl Canned {
    fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            last: Mutex::new(None),
        }
    }

    fn err(error: LLMError) -> Self {
        Self {
            reply: Err(error),
            last: Mutex::new(None),
        }
    }
}

impl CompletionBackend for Canned {
    fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError> {
        *self.last.lock().unwrap() = Some(request.clone());
        self.reply.clone().map(|content| LLMResponse {
            content,
            tokens_used: Some(42),
            model: request.model.clone(),
        })
    }
}

fn settings() -> LlmSettings {
    LlmSettings {
        provider: "groq".to_string(),
        model: "test-model".to_string(),
        api_key: "key".to_string(),
        temperature: Some(0.0),
        max_tokens: Some(256),
        timeout_seconds: Some(30),
    }
}

#[rstest]
#[case(r#"{"verdict": "no", "confidence": "high", "reasoning": "different first names"}"#, false, Confidence::High)]
#[case(r#"Here you go: {"match": true, "confidence": "medium"}"#, true, Confidence::Medium)]
#[case(r#"{"answer": "yes", "confidence": "certain"}"#, true, Confidence::Medium)]
fn test_oracle_verdicts(#[case] reply: &str, #[case] matched: bool, #[case] confidence: Confidence) {
    let oracle = LlmOracle::with_backend(settings(), Canned::ok(reply));
    let outcome = Screener::new()
        .with_oracle(oracle)
        .screen("Michael Brown", "Michelle Brown won the award for her research.");

    assert_eq!(outcome.decision.method, MatchMethod::LlmDisambiguation);
    assert_eq!(outcome.decision.matched, matched);
    assert_eq!(outcome.decision.confidence, confidence);
}

#[test]
fn test_oracle_request_contents() {
    let backend = Canned::ok(r#"{"verdict": "no", "confidence": "high"}"#);
    let oracle = LlmOracle::with_backend(settings(), &backend);
    Screener::new()
        .with_oracle(oracle)
        .screen("Michael Brown", "Michelle Brown won the award.");

    let request = backend.last.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, "test-model");
    assert_eq!(request.messages[0].role, LLMRole::System);
    assert!(request.messages[1].content.contains("Michael Brown"));
    assert!(request.messages[1].content.contains("'michelle brown'"));
}

#[test]
fn test_configured_timeout_reaches_backend() {
    let config = LlmConfig {
        timeout_seconds: 7,
        ..LlmConfig::default()
    };
    let settings = LlmSettings::resolve(&config, |_| Some("key".to_string())).unwrap();

    let backend = Canned::ok(r#"{"verdict": "no", "confidence": "high"}"#);
    Screener::new()
        .with_oracle(LlmOracle::with_backend(settings.clone(), &backend))
        .screen("Michael Brown", "Michelle Brown won the award.");
    let request = backend.last.lock().unwrap().clone().unwrap();
    assert_eq!(request.timeout_seconds, Some(7));

    let backend = Canned::ok(r#"["Zeb"]"#);
    LlmNicknameSource::with_backend(settings, &backend)
        .nicknames_for("zebulon")
        .unwrap();
    let request = backend.last.lock().unwrap().clone().unwrap();
    assert_eq!(request.timeout_seconds, Some(7));
}

#[rstest]
#[case(Canned::ok("I am not sure."))]
#[case(Canned::ok(r#"{"verdict": "possibly"}"#))]
#[case(Canned::err(LLMError::NetworkError { message: "timed out".to_string() }))]
#[case(Canned::err(LLMError::InvalidApiKey))]
fn test_oracle_failures_are_conservative(#[case] backend: Canned) {
    let oracle = LlmOracle::with_backend(settings(), backend);
    let outcome = Screener::new()
        .with_oracle(oracle)
        .screen("Michael Brown", "Michelle Brown won the award.");

    assert!(!outcome.decision.matched);
    assert_eq!(outcome.decision.method, MatchMethod::LlmError);
    assert_eq!(outcome.decision.confidence, Confidence::Low);
}

#[test]
fn test_nickname_source_feeds_variants() {
    let source = LlmNicknameSource::with_backend(settings(), Canned::ok(r#"["Zeb", "Lonny"]"#));
    assert_eq!(source.nicknames_for("zebulon").unwrap(), vec!["zeb", "lonny"]);

    let variants = VariantGenerator::default().with_source(&source).generate("Zebulon Pike");
    assert!(variants.contains("zeb pike"));
    assert!(variants.contains("lonny pike"));
}

#[test]
fn test_nickname_source_failure_is_empty() {
    let source = LlmNicknameSource::with_backend(
        settings(),
        Canned::err(LLMError::RateLimited {
            retry_after_seconds: Some(60),
        }),
    );
    assert!(source.nicknames_for("zebulon").is_err());

    let variants = VariantGenerator::default().with_source(&source).generate("Zebulon Pike");
    assert_eq!(variants, VariantGenerator::default().generate("Zebulon Pike"));
}
