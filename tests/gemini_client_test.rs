use caption_api::{CompletionError, CompletionService, GeminiClient, ResponseFormat};
use httpmock::prelude::*;
use serde_json::json;

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key", "gemini-test").with_base_url(server.base_url())
}

#[tokio::test]
async fn test_complete_text_returns_candidate_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-test:generateContent")
                .query_param("key", "test-key")
                .body_contains("Write a tweet");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Launch day! #rust" }] } }]
            }));
        })
        .await;

    let text = client(&server)
        .complete_text("Write a tweet", ResponseFormat::Text)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Launch day! #rust");
}

#[tokio::test]
async fn test_json_format_sets_response_mime_type() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-test:generateContent")
                .json_body_partial(r#"{"generationConfig":{"responseMimeType":"application/json"}}"#);
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{\"summary\":\"ok\"}" }] } }]
            }));
        })
        .await;

    let text = client(&server)
        .complete_text("Summarize", ResponseFormat::Json)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, r#"{"summary":"ok"}"#);
}

#[tokio::test]
async fn test_status_codes_map_to_errors() {
    let cases = [
        (429, "Quota exceeded"),
        (404, "models/gemini-test is not found"),
        (503, "The model is overloaded"),
    ];

    for (status, message) in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-test:generateContent");
                then.status(status)
                    .json_body(json!({ "error": { "code": status, "message": message } }));
            })
            .await;

        let err = client(&server)
            .complete_text("hi", ResponseFormat::Text)
            .await
            .unwrap_err();

        assert!(err.to_string().contains(message), "{err}");
        match status {
            429 => assert!(matches!(err, CompletionError::RateLimited(_))),
            404 => assert!(matches!(err, CompletionError::InvalidModel(_))),
            _ => assert!(matches!(err, CompletionError::UpstreamUnavailable(_))),
        }
    }
}

#[tokio::test]
async fn test_response_without_candidates_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-test:generateContent");
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let err = client(&server)
        .complete_text("hi", ResponseFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::MalformedCompletion(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_unavailable() {
    let client = GeminiClient::new("k", "m").with_base_url("http://127.0.0.1:1");
    let err = client
        .complete_text("hi", ResponseFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_list_models() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/models").query_param("key", "test-key");
            then.status(200).json_body(json!({
                "models": [
                    {
                        "name": "models/gemini-2.0-flash",
                        "displayName": "Gemini 2.0 Flash",
                        "supportedGenerationMethods": ["generateContent", "countTokens"]
                    },
                    {
                        "name": "models/text-embedding-004",
                        "supportedGenerationMethods": ["embedContent"]
                    }
                ]
            }));
        })
        .await;

    let models = client(&server).list_models().await.unwrap();
    mock.assert_async().await;

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id(), "gemini-2.0-flash");
    assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
    assert!(models[0].supports_generate_content());
    assert!(!models[1].supports_generate_content());
}

#[tokio::test]
async fn test_with_model_targets_other_model() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-other:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "OK" }] } }]
            }));
        })
        .await;

    let probe = client(&server).with_model("gemini-other");
    assert_eq!(probe.model(), "gemini-other");
    assert_eq!(probe.complete_text("ping", ResponseFormat::Text).await.unwrap(), "OK");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_timeout_is_applied() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-test:generateContent");
            then.status(200)
                .delay(std::time::Duration::from_secs(2))
                .json_body(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
                }));
        })
        .await;

    let err = client(&server)
        .with_timeout(std::time::Duration::from_millis(200))
        .complete_text("hi", ResponseFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::UpstreamUnavailable(_)));
}
