//! Tests for provider construction and capability classification.

use quorum_llm::{Client, Provider, ProviderKind, build_provider};

#[test]
fn kind_round_trips_through_str() {
    for kind in ProviderKind::ALL {
        let parsed: ProviderKind = kind.as_str().parse().expect("parse");
        assert_eq!(parsed, kind);
    }
}

#[test]
fn unknown_kind_fails_to_parse() {
    let result = "mistral".parse::<ProviderKind>();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unknown provider"));
}

#[test]
fn tool_capability_split() {
    assert!(ProviderKind::Grok.tool_capable());
    assert!(ProviderKind::Claude.tool_capable());
    assert!(ProviderKind::Ollama.tool_capable());
    assert!(!ProviderKind::Groq.tool_capable());
    assert!(!ProviderKind::Gemini.tool_capable());
}

#[test]
fn key_env_names() {
    assert_eq!(ProviderKind::Grok.key_env(), Some("GROK_API_KEY"));
    assert_eq!(ProviderKind::Groq.key_env(), Some("GROQ_API_KEY"));
    assert_eq!(ProviderKind::Gemini.key_env(), Some("GEMINI_API_KEY"));
    assert_eq!(ProviderKind::Claude.key_env(), Some("CLAUDE_API_KEY"));
    assert_eq!(ProviderKind::Ollama.key_env(), None);
}

#[test]
fn missing_key_is_a_config_error() {
    let result = build_provider(ProviderKind::Claude, None, None, Client::new());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("missing API key"));
}

#[test]
fn ollama_needs_no_key() {
    let provider = build_provider(ProviderKind::Ollama, None, None, Client::new())
        .expect("ollama without key");
    match provider {
        Provider::OpenAi(p) => {
            assert_eq!(p.endpoint(), "http://localhost:11434/v1/chat/completions");
        }
        _ => panic!("ollama should use the OpenAI-compatible adapter"),
    }
}

#[test]
fn ollama_base_url_override() {
    let provider = build_provider(
        ProviderKind::Ollama,
        None,
        Some("http://10.0.0.5:11434/"),
        Client::new(),
    )
    .expect("ollama with base url");
    match provider {
        Provider::OpenAi(p) => {
            assert_eq!(p.endpoint(), "http://10.0.0.5:11434/v1/chat/completions");
        }
        _ => panic!("ollama should use the OpenAI-compatible adapter"),
    }
}

#[test]
fn serde_tags_are_lowercase() {
    let json = serde_json::to_string(&ProviderKind::Claude).unwrap();
    assert_eq!(json, "\"claude\"");
    let back: ProviderKind = serde_json::from_str("\"groq\"").unwrap();
    assert_eq!(back, ProviderKind::Groq);
}
