use lew_estimator::advice::{advice_prompt, DEFAULT_MODEL, SYSTEM_MESSAGE};
use lew_estimator::page::{RecordingSurface, ADVICE_ERROR, DISCLAIMER, MISSING_KEY_WARNING};
use lew_estimator::{
    AdviceOutcome, AdviceSettings, Advisor, AdvisorConfig, CredentialSource, Element, Error,
    ErrorDetail, FinishReason, Inputs, LLMProvider, LLMRequest, OpenAIProvider, Page,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADVICE_SSE: &str = include_str!("fixtures/advice_response.sse");
const STREAM_ERROR_SSE: &str = include_str!("fixtures/stream_error.sse");
const EXPECTED_ADVICE: &str =
    "1. Take a brisk walk every day.\n2. Protect your sleep.\n3. Call a friend this week.";

fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/event-stream")
        .insert_header("cache-control", "no-cache")
}

fn advisor_for(server: &MockServer) -> Advisor {
    let provider = OpenAIProvider::new_with_base_url("test-api-key", server.uri())
        .expect("Failed to create OpenAI provider");
    Advisor::new(Box::new(provider), AdviceSettings::default())
}

/// The request body expected for the default inputs.
fn default_request_body() -> serde_json::Value {
    let inputs = Inputs::default();
    let prompt = advice_prompt(inputs.score(), inputs.wellby(), inputs.risk_adjustment());
    let user = prompt.items()[1].content().unwrap();

    json!({
        "model": DEFAULT_MODEL,
        "messages": [
            {"role": "system", "content": SYSTEM_MESSAGE},
            {"role": "user", "content": user}
        ],
        "temperature": 0.7,
        "stream": true
    })
}

#[tokio::test]
async fn test_provider_streams_chat_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(sse_response(ADVICE_SSE))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new_with_base_url("test-api-key", server.uri()).unwrap();
    let prompt = lew_estimator::Prompt::system("sys").with_user("hi");
    let request = LLMRequest::from_prompt("gpt-4o", &prompt).temperature(0.7);

    let complete = provider.generate(&request).await.unwrap().buffer().await.unwrap();
    assert_eq!(complete.finish_reason, FinishReason::Stop);
    assert_eq!(complete.usage.input_tokens, 98);
    assert_eq!(complete.usage.output_tokens, 24);
    assert_eq!(complete.content.trim(), EXPECTED_ADVICE);
}

#[tokio::test]
async fn test_advice_request_payload_and_trimming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(default_request_body()))
        .respond_with(sse_response(ADVICE_SSE))
        .expect(1)
        .mount(&server)
        .await;

    let advice = advisor_for(&server)
        .advise(&Inputs::default())
        .await
        .unwrap();
    assert_eq!(advice, EXPECTED_ADVICE);
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: test-api-key.",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let err = advisor_for(&server)
        .advise(&Inputs::default())
        .await
        .unwrap_err();
    match err {
        Error::Auth(message) => assert!(message.starts_with("Incorrect API key")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_page_renders_score_and_advice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(sse_response(ADVICE_SSE))
        .expect(1)
        .mount(&server)
        .await;

    let advisor = advisor_for(&server);
    let mut surface = RecordingSurface::default();
    let outcome = Page::default()
        .render(&Inputs::default(), Some(&advisor), &mut surface)
        .await;

    assert_eq!(outcome, AdviceOutcome::Advice(EXPECTED_ADVICE.to_string()));
    assert_eq!(surface.waits, 1);
    assert!(!surface.is_waiting());
    assert!(surface.elements.contains(&Element::Metric {
        label: "LEW (Life-Enhanced Wellbeing)".to_string(),
        value: "238.00".to_string(),
    }));
    assert!(surface
        .elements
        .contains(&Element::Text(EXPECTED_ADVICE.to_string())));
    assert_eq!(
        surface.elements.last(),
        Some(&Element::Caption(DISCLAIMER.to_string()))
    );
}

#[tokio::test]
async fn test_page_shows_error_banner_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let advisor = advisor_for(&server);
    let mut surface = RecordingSurface::default();
    let outcome = Page::new(ErrorDetail::Shown)
        .render(&Inputs::with_values(120.0, 10.0, 1.0), Some(&advisor), &mut surface)
        .await;

    assert!(matches!(outcome, AdviceOutcome::Failed(ref message) if message.contains("upstream exploded")));
    assert!(!surface.is_waiting());
    assert!(surface
        .elements
        .contains(&Element::Error(ADVICE_ERROR.to_string())));
    assert!(surface.elements.iter().any(|e| matches!(
        e,
        Element::Caption(text) if text.starts_with("Details: ") && text.contains("upstream exploded")
    )));
    // Score is still rendered and the footer is reached.
    assert!(surface.elements.iter().any(|e| matches!(
        e,
        Element::Metric { value, .. } if value == "1200.00"
    )));
    assert_eq!(
        surface.elements.last(),
        Some(&Element::Caption(DISCLAIMER.to_string()))
    );
}

#[tokio::test]
async fn test_error_inside_stream_shows_banner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(sse_response(STREAM_ERROR_SSE))
        .expect(1)
        .mount(&server)
        .await;

    let advisor = advisor_for(&server);
    let mut surface = RecordingSurface::default();
    let outcome = Page::new(ErrorDetail::Shown)
        .render(&Inputs::default(), Some(&advisor), &mut surface)
        .await;

    assert!(matches!(
        outcome,
        AdviceOutcome::Failed(ref message) if message.contains("The server had an error")
    ));
    assert!(surface
        .elements
        .contains(&Element::Error(ADVICE_ERROR.to_string())));
    assert!(surface.elements.iter().any(|e| matches!(
        e,
        Element::Caption(text) if text.starts_with("Details: ") && text.contains("The server had an error")
    )));
    // The partial content never reaches the page.
    assert!(!surface
        .elements
        .iter()
        .any(|e| matches!(e, Element::Text(text) if text.contains("Walk daily."))));
}

#[tokio::test]
async fn test_page_hides_error_details_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let advisor = advisor_for(&server);
    let mut surface = RecordingSurface::default();
    Page::new(ErrorDetail::Hidden)
        .render(&Inputs::default(), Some(&advisor), &mut surface)
        .await;

    assert!(surface
        .elements
        .contains(&Element::Error(ADVICE_ERROR.to_string())));
    assert!(!surface.elements.iter().any(|e| matches!(
        e,
        Element::Caption(text) if text.starts_with("Details:")
    )));
}

#[tokio::test]
async fn test_missing_credential_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sse_response(ADVICE_SSE))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = AdvisorConfig {
        base_url: server.uri(),
        source: CredentialSource::Secrets {
            path: dir.path().join("secrets.toml"),
        },
        ..AdvisorConfig::default()
    };
    let advisor = config.advisor().unwrap();
    assert!(advisor.is_none());

    let mut surface = RecordingSurface::default();
    let outcome = Page::default()
        .render(&Inputs::default(), advisor.as_ref(), &mut surface)
        .await;

    assert_eq!(outcome, AdviceOutcome::Skipped);
    assert_eq!(surface.waits, 0);
    assert!(surface
        .elements
        .contains(&Element::Warning(MISSING_KEY_WARNING.to_string())));
}

#[tokio::test]
async fn test_connection_failure_does_not_crash_page() {
    // Nothing listens on the reserved discard port.
    let provider = OpenAIProvider::new_with_base_url("test-api-key", "http://127.0.0.1:9").unwrap();
    let advisor = Advisor::new(Box::new(provider), AdviceSettings::default());

    let mut surface = RecordingSurface::default();
    let outcome = Page::default()
        .render(&Inputs::default(), Some(&advisor), &mut surface)
        .await;

    assert!(matches!(outcome, AdviceOutcome::Failed(_)));
    assert!(surface
        .elements
        .contains(&Element::Error(ADVICE_ERROR.to_string())));
}
