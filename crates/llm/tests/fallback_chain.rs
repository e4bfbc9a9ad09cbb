//! End-to-end fallback chain against mocked provider endpoints

use rectifai_config::{FallbackConfig, ProvidersConfig};
use rectifai_core::{CorrectionSource, Error, ProviderKind};
use rectifai_llm::{CorrectionOrchestrator, LlmError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chain(config: ProvidersConfig) -> CorrectionOrchestrator {
    CorrectionOrchestrator::from_config(&config, &FallbackConfig::default()).unwrap()
}

#[tokio::test]
async fn no_credentials_goes_straight_to_rules() {
    let orchestrator = chain(ProvidersConfig::unconfigured());

    let outcome = orchestrator
        .correct_text_detailed("i cant go there.")
        .await
        .unwrap();

    assert_eq!(outcome.source, CorrectionSource::RuleBased);
    assert_eq!(outcome.result.corrected, "I can't go there.");
    assert!(outcome.result.changes.types.contains(&"grammar".to_string()));
    assert!(outcome.result.changes.types.contains(&"capitalization".to_string()));
    assert!(outcome.result.changes.total > 0);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.skipped.len(), ProviderKind::ALL.len());
}

#[tokio::test]
async fn whitespace_is_normalized_by_rules() {
    let orchestrator = chain(ProvidersConfig::unconfigured());

    let result = orchestrator
        .correct_text("  too   many   spaces.  ")
        .await
        .unwrap();

    assert_eq!(result.corrected, "Too many spaces.");
    assert!(result.changes.total > 0);
}

#[tokio::test]
async fn empty_input_reaches_no_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator = chain(
        ProvidersConfig::unconfigured()
            .with_order(vec![ProviderKind::OpenAi])
            .with_api_key(ProviderKind::OpenAi, "sk-test")
            .with_endpoint(ProviderKind::OpenAi, server.uri()),
    );

    let err = orchestrator.correct_text("").await.unwrap_err();
    assert_eq!(err, Error::InputRequired);
    assert_eq!(err.to_string(), "Input text is required");
}

#[tokio::test]
async fn failing_provider_falls_through_to_next() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&openai)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "I can't go there."}]}}]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let huggingface = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&huggingface)
        .await;

    let orchestrator = chain(
        ProvidersConfig::unconfigured()
            .with_order(vec![
                ProviderKind::OpenAi,
                ProviderKind::Gemini,
                ProviderKind::HuggingFace,
            ])
            .with_api_key(ProviderKind::OpenAi, "sk-test")
            .with_endpoint(ProviderKind::OpenAi, openai.uri())
            .with_api_key(ProviderKind::Gemini, "g-key")
            .with_endpoint(ProviderKind::Gemini, gemini.uri())
            .with_api_key(ProviderKind::HuggingFace, "hf_test")
            .with_endpoint(ProviderKind::HuggingFace, huggingface.uri()),
    );

    let outcome = orchestrator
        .correct_text_detailed("i cant go there.")
        .await
        .unwrap();

    assert_eq!(outcome.source, CorrectionSource::Provider(ProviderKind::Gemini));
    assert_eq!(outcome.result.corrected, "I can't go there.");
    assert_eq!(outcome.result.changes.total, 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].provider, ProviderKind::OpenAi);
    assert_eq!(
        outcome.failures[0].error,
        LlmError::Api {
            status: 500,
            message: "upstream exploded".into()
        }
    );
}

#[tokio::test]
async fn every_provider_failing_still_yields_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(2)
        .mount(&server)
        .await;

    let orchestrator = chain(
        ProvidersConfig::unconfigured()
            .with_order(vec![ProviderKind::OpenAi, ProviderKind::Perplexity])
            .with_api_key(ProviderKind::OpenAi, "sk-test")
            .with_endpoint(ProviderKind::OpenAi, server.uri())
            .with_api_key(ProviderKind::Perplexity, "pplx-test")
            .with_endpoint(ProviderKind::Perplexity, server.uri()),
    );

    let outcome = orchestrator
        .correct_text_detailed("teh report is very good")
        .await
        .unwrap();

    assert!(outcome.used_fallback());
    assert_eq!(outcome.result.corrected, "The report is excellent");
    assert!(outcome.failures.iter().all(|f| f.error.is_rate_limited()));
}
