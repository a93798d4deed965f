use std::time::Duration;

use sage::AskMode;
use sage::core::transcript::Body;
use sage::service::types::{GENERIC_ERROR_TEXT, NO_RESPONSE_TEXT};
use sage::service::{AnswerService, AskRequest, HttpAnswerService, Outcome, ServiceError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn client(base_url: String) -> HttpAnswerService {
    HttpAnswerService::new(base_url, Duration::from_secs(5)).unwrap()
}

fn ask_request(question: &str) -> AskRequest<'_> {
    AskRequest {
        question,
        mode: AskMode::Auto,
    }
}

// ============================================================================
// Success shapes
// ============================================================================

#[tokio::test]
async fn test_answer_html_reply_normalizes_to_rich_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"answer_html": "<p>42</p>"})),
        )
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let reply = service.ask(ask_request("what is 6 * 7?")).await.unwrap();

    assert_eq!(
        reply.into_outcome(),
        Outcome::Answered {
            body: Body::Html("<p>42</p>".into())
        }
    );
}

#[tokio::test]
async fn test_legacy_answer_reply_normalizes_to_markdown_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "**42**"})))
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let reply = service.ask(ask_request("what is 6 * 7?")).await.unwrap();

    assert_eq!(
        reply.into_outcome(),
        Outcome::Answered {
            body: Body::Markdown("**42**".into())
        }
    );
}

#[tokio::test]
async fn test_success_without_answer_field_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let reply = service.ask(ask_request("hello?")).await.unwrap();

    assert_eq!(
        reply.into_outcome(),
        Outcome::Answered {
            body: Body::Plain(NO_RESPONSE_TEXT.into())
        }
    );
}

#[tokio::test]
async fn test_error_field_on_success_status_collapses_to_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "model overloaded"})),
        )
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let reply = service.ask(ask_request("anything")).await.unwrap();

    // The user never sees "model overloaded"
    assert_eq!(
        reply.into_outcome(),
        Outcome::Failed {
            message: GENERIC_ERROR_TEXT.into()
        }
    );
}

// ============================================================================
// Wire contract
// ============================================================================

#[tokio::test]
async fn test_auto_mode_omitted_from_request_body() {
    let mock_server = MockServer::start().await;

    // body_json is an exact match; a stray "mode" key would fail it
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({"question": "Help me with math"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer_html": "<p>ok</p>"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let result = service.ask(ask_request("Help me with math")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_explicit_mode_sent_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({"question": "2+2", "mode": "math"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer_html": "<p>4</p>"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let result = service
        .ask(AskRequest {
            question: "2+2",
            mode: AskMode::Math,
        })
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_sequential_asks_are_independent_round_trips() {
    let mock_server = MockServer::start().await;

    // No caching: the same question twice must hit the service twice
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer_html": "<p>a</p>"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    service.ask(ask_request("same question")).await.unwrap();
    service.ask(ask_request("same question")).await.unwrap();
}

// ============================================================================
// Failure taxonomy
// ============================================================================

#[tokio::test]
async fn test_http_500_is_api_error_with_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "internal failure"})),
        )
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let result = service.ask(ask_request("anything")).await;

    match result {
        Err(ServiceError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal failure");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_400_with_plain_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let result = service.ask(ask_request("")).await;

    assert!(matches!(
        result,
        Err(ServiceError::Api { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let service = client(mock_server.uri());
    let result = service.ask(ask_request("anything")).await;

    assert!(matches!(result, Err(ServiceError::Parse(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // Nothing listens on port 1
    let service = client("http://127.0.0.1:1".to_string());
    let result = service.ask(ask_request("anything")).await;

    assert!(matches!(result, Err(ServiceError::Network(_))));
}

#[tokio::test]
async fn test_slow_service_times_out_as_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"answer_html": "<p>late</p>"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    // Client allows only 100ms
    let service = HttpAnswerService::new(mock_server.uri(), Duration::from_millis(100)).unwrap();
    let result = service.ask(ask_request("anything")).await;

    assert!(matches!(result, Err(ServiceError::Network(_))));
}
