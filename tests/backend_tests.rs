//! Backend adapter tests against a local mock HTTP server.

use serde_json::json;
use subtrans::error::SubtransError;
use subtrans::transcribe::{GeminiTranscriber, Transcriber};
use subtrans::translate::claude::ClaudeTranslator;
use subtrans::translate::gemini::GeminiTranslator;
use subtrans::translate::openai::OpenAiTranslator;
use subtrans::translate::openrouter::OpenRouterTranslator;
use subtrans::translate::Translator;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INPUT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello";

// ============================================================================
// OpenAI (chat-completion with system directive)
// ============================================================================

#[tokio::test]
async fn test_openai_translate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "1\n00:00:01,000 --> 00:00:02,000\nHola"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = OpenAiTranslator::new("sk-test".to_string()).with_base_url(server.uri());
    let result = translator.translate(INPUT, "Spanish").await.unwrap();
    assert_eq!(result, "1\n00:00:01,000 --> 00:00:02,000\nHola");
}

#[tokio::test]
async fn test_openai_error_carries_cause() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let translator = OpenAiTranslator::new("sk-bad".to_string()).with_base_url(server.uri());
    let err = translator.translate(INPUT, "Spanish").await.unwrap_err();
    assert!(matches!(err, SubtransError::Api(_)));
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("invalid api key"));
}

// ============================================================================
// Gemini (single-prompt generative call)
// ============================================================================

#[tokio::test]
async fn test_gemini_translate_strips_fences() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "g-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{
                "text": "```srt\n1\n00:00:01,000 --> 00:00:02,000\nBonjour\n```"
            }]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = GeminiTranslator::new("g-test".to_string()).with_base_url(server.uri());
    let result = translator.translate(INPUT, "French").await.unwrap();
    assert_eq!(result, "1\n00:00:01,000 --> 00:00:02,000\nBonjour");
}

#[tokio::test]
async fn test_gemini_reports_api_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"message": "quota exceeded"}
        })))
        .mount(&server)
        .await;

    let translator = GeminiTranslator::new("g-test".to_string()).with_base_url(server.uri());
    let err = translator.translate(INPUT, "French").await.unwrap_err();
    assert!(err.to_string().contains("quota exceeded"));
}

// ============================================================================
// Claude (typed content segments)
// ============================================================================

#[tokio::test]
async fn test_claude_concatenates_text_segments_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "a-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "thinking", "thinking": "let me translate this"},
                {"type": "text", "text": "1\n00:00:01,000 --> 00:00:02,000\n"},
                {"type": "text", "text": "Hallo"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = ClaudeTranslator::new("a-test".to_string()).with_base_url(server.uri());
    let result = translator.translate(INPUT, "German").await.unwrap();
    assert_eq!(result, "1\n00:00:01,000 --> 00:00:02,000\nHallo");
}

#[tokio::test]
async fn test_claude_no_text_segments_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "tool_use", "id": "x", "name": "y", "input": {}}]
        })))
        .mount(&server)
        .await;

    let translator = ClaudeTranslator::new("a-test".to_string()).with_base_url(server.uri());
    assert!(translator.translate(INPUT, "German").await.is_err());
}

// ============================================================================
// OpenRouter (OpenAI-compatible aggregator)
// ============================================================================

#[tokio::test]
async fn test_openrouter_translate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer or-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "1\n00:00:01,000 --> 00:00:02,000\nCiao"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = OpenRouterTranslator::new("or-test".to_string()).with_base_url(server.uri());
    let result = translator.translate(INPUT, "Italian").await.unwrap();
    assert_eq!(result, "1\n00:00:01,000 --> 00:00:02,000\nCiao");
}

#[tokio::test]
async fn test_openrouter_missing_content_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let translator = OpenRouterTranslator::new("or-test".to_string()).with_base_url(server.uri());
    assert!(translator.translate(INPUT, "Italian").await.is_err());
}

// ============================================================================
// Gemini transcription (inline audio)
// ============================================================================

#[tokio::test]
async fn test_transcriber_returns_stripped_srt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "g-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{
                "text": "```srt\n1\n00:00:00,500 --> 00:00:02,000\nHello there\n```"
            }]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let audio = temp.path().join("audio.mp3");
    std::fs::write(&audio, b"not really audio").unwrap();

    let transcriber = GeminiTranscriber::new("g-test".to_string()).with_base_url(server.uri());
    let srt = transcriber.transcribe(&audio).await.unwrap();
    assert_eq!(srt, "1\n00:00:00,500 --> 00:00:02,000\nHello there");
}

#[tokio::test]
async fn test_transcriber_server_error_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let audio = temp.path().join("audio.mp3");
    std::fs::write(&audio, b"not really audio").unwrap();

    let transcriber = GeminiTranscriber::new("g-test".to_string()).with_base_url(server.uri());
    let err = transcriber.transcribe(&audio).await.unwrap_err();
    assert!(err.to_string().contains("internal error"));
}
