//! Tests for HttpTransport header construction.

use quorum_llm::{Client, HttpTransport};

#[test]
fn bearer_sets_authorization_header() {
    let transport = HttpTransport::bearer(Client::new(), "test-key", "http://example.com/v1/chat")
        .expect("bearer transport");

    let auth = transport
        .headers()
        .get("authorization")
        .expect("authorization header");
    assert_eq!(auth.to_str().unwrap(), "Bearer test-key");
    assert_eq!(transport.endpoint(), "http://example.com/v1/chat");
}

#[test]
fn no_auth_omits_authorization_header() {
    let transport = HttpTransport::no_auth(Client::new(), "http://localhost:11434/v1/chat");

    assert!(transport.headers().get("authorization").is_none());
    assert_eq!(transport.endpoint(), "http://localhost:11434/v1/chat");
}

#[test]
fn custom_header_sets_named_header() {
    let transport =
        HttpTransport::custom_header(Client::new(), "x-api-key", "sk-123", "http://example.com")
            .expect("custom header transport");

    let key = transport.headers().get("x-api-key").expect("x-api-key");
    assert_eq!(key.to_str().unwrap(), "sk-123");
    assert!(transport.headers().get("authorization").is_none());
}

#[test]
fn with_header_appends() {
    let transport =
        HttpTransport::custom_header(Client::new(), "x-api-key", "sk-123", "http://example.com")
            .unwrap()
            .with_header("anthropic-version", "2023-06-01")
            .unwrap();

    let version = transport
        .headers()
        .get("anthropic-version")
        .expect("version header");
    assert_eq!(version.to_str().unwrap(), "2023-06-01");
}

#[test]
fn content_type_and_accept_always_json() {
    let transport = HttpTransport::no_auth(Client::new(), "http://localhost:8080");
    let ct = transport.headers().get("content-type").expect("content-type");
    assert_eq!(ct.to_str().unwrap(), "application/json");
    let accept = transport.headers().get("accept").expect("accept");
    assert_eq!(accept.to_str().unwrap(), "application/json");
}
