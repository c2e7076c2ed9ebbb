//! HTTP backend tests against a local mock server.

use std::sync::Arc;

use serde_json::json;
use socialspark_core::state::{CONNECT_APOLOGY, CONNECT_ERROR_BANNER};
use socialspark_core::{
    AccountIngestor, ChatMessage, ChatSession, HttpBackend, ResponseGenerator, SessionSettings,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn connect_posts_handle_and_returns_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .and(body_json(json!({ "handle": "@sparkfan" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Processed 24 posts from @sparkfan."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri());
    let summary = backend.connect_account("@sparkfan").await.expect("connect should succeed");

    assert_eq!(summary.message, "Processed 24 posts from @sparkfan.");
}

#[tokio::test]
async fn chat_posts_message_and_returns_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "Analyze my recent posts" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Here are your insights..."
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri());
    let reply = backend
        .send_message("Analyze my recent posts")
        .await
        .expect("chat should succeed");

    assert_eq!(reply.response, "Here are your insights...");
}

#[tokio::test]
async fn server_error_maps_to_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri());
    let err = backend.send_message("hello").await.unwrap_err();

    assert!(err.detail.contains("500"), "detail was: {}", err.detail);
    assert!(err.detail.contains("model crashed"));
}

#[tokio::test]
async fn malformed_body_maps_to_processing_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri());
    let err = backend.connect_account("@sparkfan").await.unwrap_err();

    assert!(err.detail.contains("invalid response"), "detail was: {}", err.detail);
}

#[tokio::test]
async fn session_over_http_recovers_from_failed_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/connect"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "**Tuesday** at 6pm works best."
        })))
        .mount(&server)
        .await;

    let backend = Arc::new(HttpBackend::new(&server.uri()));
    let (mut session, mut events) =
        ChatSession::new(backend.clone(), backend, SessionSettings::default());

    assert!(session.connect_account("@missing"));
    session.apply(events.recv().await.expect("connect result"));
    assert!(!session.state().is_connected());
    assert_eq!(session.state().transient_error(), Some(CONNECT_ERROR_BANNER));

    session.skip_connection();
    session.set_draft("When should I post?");
    assert!(session.submit_draft());
    session.apply(events.recv().await.expect("chat result"));

    assert_eq!(
        session.state().transcript(),
        &[
            ChatMessage::assistant(CONNECT_APOLOGY),
            ChatMessage::user("When should I post?"),
            ChatMessage::assistant("**Tuesday** at 6pm works best."),
        ]
    );
    // A successful chat turn also dismisses the banner.
    assert!(session.state().transient_error().is_none());
}
