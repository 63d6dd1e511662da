//! Tests for the [`OllamaVision`] provider against a mock HTTP server.

use bakelens::{BakelensError, OllamaVision, VisionModel};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn generate_returns_response_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llava",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "A golden croissant.",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = OllamaVision::new(server.uri());
    let text = model
        .generate_content(b"jpeg-bytes", "what is this?")
        .await
        .unwrap();
    assert_eq!(text, "A golden croissant.");
}

#[tokio::test]
async fn custom_model_tag_sent_in_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "bakellava" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "A scone." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let model = OllamaVision::new(server.uri()).model("bakellava");
    let text = model.generate_content(b"img", "prompt").await.unwrap();
    assert_eq!(text, "A scone.");
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let model = OllamaVision::new(server.uri());
    match model.generate_content(b"img", "prompt").await {
        Err(BakelensError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("model not loaded"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_response_maps_to_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "  " })))
        .mount(&server)
        .await;

    let model = OllamaVision::new(server.uri());
    assert!(matches!(
        model.generate_content(b"img", "prompt").await,
        Err(BakelensError::EmptyResponse)
    ));
}

#[tokio::test]
async fn malformed_body_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let model = OllamaVision::new(server.uri());
    assert!(model.generate_content(b"img", "prompt").await.is_err());
}

#[tokio::test]
async fn connection_refused_is_retryable() {
    // Port 1 is never listening.
    let model = OllamaVision::new("http://127.0.0.1:1");
    let err = model.generate_content(b"img", "prompt").await.unwrap_err();
    assert!(err.is_retryable(), "got {err:?}");
}
