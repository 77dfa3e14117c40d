//! Contract Test: POST /audit 上流プロキシと結果の正規化

use crate::support::{audit_request, build_app, build_app_with, send, TEST_API_KEY, TEST_SECRET};
use axum::http::StatusCode;
use luau_audit_relay_common::config::RelayConfig;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_with_content(content: &str) -> Value {
    json!({
        "id": "chatcmpl_test",
        "object": "chat.completion",
        "created": 0,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn upstream_replying(body: Value) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_parsed_json_is_returned() {
    let mock_server = upstream_replying(completion_with_content("{\"issues\":[]}")).await;
    let app = build_app(mock_server.uri());

    let response = send(
        app,
        audit_request(Some(TEST_SECRET), r#"{"scripts":["local x = 1"]}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(response.json(), json!({ "issues": [] }));
}

#[tokio::test]
async fn test_non_json_content_is_passed_through_raw() {
    let mock_server = upstream_replying(completion_with_content("not json")).await;
    let app = build_app(mock_server.uri());

    let response = send(
        app,
        audit_request(Some(TEST_SECRET), r#"{"scripts":["local x = 1"]}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "not json");
}

#[tokio::test]
async fn test_missing_choices_returns_empty_object() {
    let mock_server = upstream_replying(json!({ "id": "chatcmpl_test" })).await;
    let app = build_app(mock_server.uri());

    let response = send(
        app,
        audit_request(Some(TEST_SECRET), r#"{"scripts":["local x = 1"]}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({}));
}

#[tokio::test]
async fn test_upstream_error_body_collapses_to_empty_object() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = build_app(mock_server.uri());

    let response = send(
        app,
        audit_request(Some(TEST_SECRET), r#"{"scripts":["local x = 1"]}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({}));
}

#[tokio::test]
async fn test_upstream_request_shape() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.1,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = build_app(mock_server.uri());

    let response = send(
        app,
        audit_request(
            Some(TEST_SECRET),
            r#"{"scripts":["local x = 1","print(x)"]}"#,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .contains("Luau code auditor"));
    assert_eq!(messages[1]["role"], "user");
    let embedded: Value = serde_json::from_str(messages[1]["content"].as_str().unwrap()).unwrap();
    assert_eq!(embedded, json!({ "scripts": ["local x = 1", "print(x)"] }));
}

#[tokio::test]
async fn test_configured_model_is_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = build_app_with(RelayConfig {
        api_key: Some(TEST_API_KEY.into()),
        shared_secret: Some(TEST_SECRET.into()),
        upstream_base_url: mock_server.uri(),
        model: "gpt-4o".into(),
        ..Default::default()
    });

    let response = send(app, audit_request(Some(TEST_SECRET), r#"{"scripts":[]}"#)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_upstream_unreachable_returns_500() {
    let app = build_app("http://127.0.0.1:9".to_string());

    let response = send(
        app,
        audit_request(Some(TEST_SECRET), r#"{"scripts":["local x = 1"]}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json();
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_non_json_body_returns_500() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream connect error"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = build_app(mock_server.uri());

    let response = send(
        app,
        audit_request(Some(TEST_SECRET), r#"{"scripts":["local x = 1"]}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse upstream response"));
}

#[tokio::test]
async fn test_missing_api_key_returns_500_without_upstream_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let app = build_app_with(RelayConfig {
        api_key: None,
        shared_secret: Some(TEST_SECRET.into()),
        upstream_base_url: mock_server.uri(),
        ..Default::default()
    });

    let response = send(app, audit_request(Some(TEST_SECRET), r#"{"scripts":[]}"#)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({ "error": "OPENAI_API_KEY is not configured" })
    );
}
