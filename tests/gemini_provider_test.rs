//! Gemini provider and controller behavior against a mock API

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatkeep::config::{ChatConfig, ProviderConfig};
use chatkeep::conversation::{ChatController, ControllerState};
use chatkeep::providers::{GeminiProvider, Provider, NO_RESPONSE_TEXT};
use chatkeep::session::{MessageText, Sender, SessionStore};
use chatkeep::storage::MemoryStore;

const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn provider_for(server: &MockServer, api_key: Option<&str>) -> GeminiProvider {
    let config = ProviderConfig {
        api_base: server.uri(),
        model: "gemini-test".to_string(),
        api_key: api_key.map(str::to_string),
        timeout_seconds: 5,
    };
    GeminiProvider::new(config).unwrap()
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({ "candidates": [ { "content": { "parts": [ { "text": text } ] } } ] })
}

#[tokio::test]
async fn test_generate_sends_prompt_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "secret-key"))
        .and(body_json(
            json!({ "contents": [ { "parts": [ { "text": "Hello there" } ] } ] }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("General Kenobi")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Some("secret-key"));
    let reply = provider.generate("Hello there").await.unwrap();
    assert_eq!(reply, "General Kenobi");
}

#[tokio::test]
async fn test_generate_without_candidates_is_no_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, None);
    assert_eq!(provider.generate("anything").await.unwrap(), NO_RESPONSE_TEXT);
}

#[tokio::test]
async fn test_generate_server_error_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, None);
    let err = provider.generate("anything").await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_generate_malformed_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, None);
    assert!(provider.generate("anything").await.is_err());
}

#[tokio::test]
async fn test_controller_splits_bullet_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reply_body("Options:\n* Rome\n* Paris ")),
        )
        .mount(&server)
        .await;

    let store = SessionStore::open(MemoryStore::new()).unwrap();
    let mut chat = ChatController::new(provider_for(&server, None), store, ChatConfig::default());

    let reply = chat.send("Where should I travel this summer?").await.unwrap().unwrap();
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(
        reply.text,
        MessageText::Lines(vec![
            "Options:".to_string(),
            "Rome".to_string(),
            "Paris".to_string()
        ])
    );

    let session = chat.active_session().unwrap();
    assert_eq!(session.name, "Where should I travel this summer?");
    assert_eq!(chat.state(), ControllerState::Idle);
}

#[tokio::test]
async fn test_controller_records_error_reply_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = SessionStore::open(MemoryStore::new()).unwrap();
    let config = ChatConfig::default();
    let expected = config.error_reply.clone();
    let mut chat = ChatController::new(provider_for(&server, None), store, config);

    let reply = chat.send("hi").await.unwrap().unwrap();
    assert_eq!(reply.text, MessageText::from(expected.as_str()));
    assert_eq!(
        expected,
        "Error: Unable to get a response. Please try again."
    );
    assert_eq!(chat.active_messages().len(), 2);
}

#[test]
fn test_unreachable_api_yields_error_reply() {
    let config = ProviderConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        model: "gemini-test".to_string(),
        api_key: None,
        timeout_seconds: 2,
    };
    let provider = GeminiProvider::new(config).unwrap();
    let store = SessionStore::open(MemoryStore::new()).unwrap();
    let mut chat = ChatController::new(provider, store, ChatConfig::default());

    let reply = tokio_test::block_on(chat.send("ping")).unwrap().unwrap();
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.text.lines(), vec![ChatConfig::default().error_reply.as_str()]);
}

#[tokio::test]
async fn test_blank_candidate_text_is_no_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("")))
        .mount(&server)
        .await;

    let store = SessionStore::open(MemoryStore::new()).unwrap();
    let mut chat = ChatController::new(provider_for(&server, None), store, ChatConfig::default());

    let reply = chat.send("hello").await.unwrap().unwrap();
    assert_eq!(reply.text.lines(), vec![NO_RESPONSE_TEXT]);
}
