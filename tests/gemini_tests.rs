use gridiron_agent::core::llm::client::LlmClient;
use gridiron_agent::core::llm::error::{LlmError, is_rate_limited};
use gridiron_agent::core::llm::gemini::{
    GeminiClient, build_request_body, error_from_status, parse_response,
};
use gridiron_agent::types::{AppEvent, ChatMessage, Tool, ToolCall};
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::json;
use tokio::sync::mpsc;

fn history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a sports AI."),
        ChatMessage::user("Who won?"),
    ]
}

#[test]
fn test_request_body_maps_roles() {
    let mut call = ToolCall::new("get_scoreboard", json!({}));
    call.thought_signature = Some("sig-1".to_string());

    let history = vec![
        ChatMessage::system("persona"),
        ChatMessage::user("scores?"),
        ChatMessage::tool_call("", vec![call, ToolCall::new("get_team_stats", json!({"team": "KC"}))]),
        ChatMessage::tool_result("get_scoreboard", "BUF 24 @ KC 27"),
        ChatMessage::tool_result("get_team_stats", "Chiefs 6-1"),
        ChatMessage::assistant("The Chiefs won."),
    ];

    let body = build_request_body(&history, &[]);

    assert_eq!(body["systemInstruction"], json!({ "parts": [{ "text": "persona" }] }));
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0], json!({ "role": "user", "parts": [{ "text": "scores?" }] }));

    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "get_scoreboard");
    assert_eq!(contents[1]["parts"][0]["thoughtSignature"], "sig-1");
    assert_eq!(contents[1]["parts"][1]["functionCall"]["args"], json!({"team": "KC"}));
    assert!(contents[1]["parts"][1].get("thoughtSignature").is_none());

    assert_eq!(contents[2]["role"], "user");
    let responses = contents[2]["parts"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["functionResponse"]["name"], "get_scoreboard");
    assert_eq!(responses[1]["functionResponse"]["response"]["content"], "Chiefs 6-1");

    assert_eq!(contents[3], json!({ "role": "model", "parts": [{ "text": "The Chiefs won." }] }));
    assert!(body.get("tools").is_none());
}

#[test]
fn test_request_body_includes_tools() {
    let team_schema = json!({
        "type": "object",
        "properties": { "team": { "type": "string" } },
        "required": ["team"]
    });
    let tools = vec![
        Tool::new(
            "get_scoreboard",
            "Get scores",
            json!({ "type": "object", "properties": {} }),
        ),
        Tool::new("get_team_stats", "Get a team", team_schema.clone()),
    ];
    let body = build_request_body(&history(), &tools);

    let declarations = &body["tools"][0]["functionDeclarations"];
    assert_eq!(declarations[0]["name"], "get_scoreboard");
    assert_eq!(declarations[0]["description"], "Get scores");
    assert!(declarations[0].get("parameters").is_none());
    assert_eq!(declarations[1]["parameters"], team_schema);
}

#[test]
fn test_parse_response_text_skips_thoughts() {
    let json = json!({
        "candidates": [{ "content": { "role": "model", "parts": [
            { "text": "thinking...", "thought": true },
            { "text": "The Bills " },
            { "text": "won." }
        ]}}]
    });
    let message = parse_response(&json).unwrap();
    assert_eq!(message, ChatMessage::assistant("The Bills won."));
}

#[test]
fn test_parse_response_function_call() {
    let json = json!({
        "candidates": [{ "content": { "parts": [
            { "functionCall": { "name": "get_stat_leaders", "args": { "category": "rushing" } }, "thoughtSignature": "abc" },
            { "functionCall": { "name": "get_scoreboard" } }
        ]}}]
    });
    let message = parse_response(&json).unwrap();
    let calls = message.tool_calls.unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].function.arguments, json!({ "category": "rushing" }));
    assert_eq!(calls[0].thought_signature.as_deref(), Some("abc"));
    assert_eq!(calls[1].function.arguments, json!({}));
}

#[test]
fn test_parse_response_errors() {
    let blocked = parse_response(&json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
    assert!(matches!(blocked, Err(LlmError::Blocked { reason }) if reason == "SAFETY"));

    let empty = parse_response(&json!({ "candidates": [] }));
    assert!(matches!(empty, Err(LlmError::MalformedResponse(_))));

    let no_parts = parse_response(&json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] }));
    assert!(matches!(no_parts, Err(LlmError::MalformedResponse(m)) if m.contains("MAX_TOKENS")));
}

#[test]
fn test_error_from_status() {
    let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
    assert!(matches!(
        error_from_status(StatusCode::TOO_MANY_REQUESTS, body),
        LlmError::RateLimited { message } if message == "Quota exceeded"
    ));

    let exhausted = r#"{"error":{"message":"busy","status":"RESOURCE_EXHAUSTED"}}"#;
    assert!(matches!(
        error_from_status(StatusCode::SERVICE_UNAVAILABLE, exhausted),
        LlmError::RateLimited { .. }
    ));

    assert!(matches!(
        error_from_status(StatusCode::BAD_REQUEST, "not json"),
        LlmError::Api { status: 400, message } if message == "not json"
    ));

    assert!(matches!(
        error_from_status(StatusCode::TOO_MANY_REQUESTS, ""),
        LlmError::RateLimited { message } if message == "Too Many Requests"
    ));
}

#[tokio::test]
async fn test_chat_non_streaming_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-test:generateContent")
                .header("x-goog-api-key", "test-key")
                .body_contains("systemInstruction");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Hello, fan!" }] } }]
                }));
        })
        .await;

    let client = GeminiClient::new(&server.base_url(), "test-key");
    let (tx, _rx) = mpsc::channel::<AppEvent>(8);
    let message = client
        .chat("gemini-test", &history(), &[], false, tx)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message.content, "Hello, fan!");
    assert!(message.tool_calls.is_none());
}

#[tokio::test]
async fn test_chat_streaming_forwards_chunks() {
    let server = MockServer::start_async().await;
    let sse = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"The Chiefs \"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"won 27-24.\"}]},\"finishReason\":\"STOP\"}]}\n\n"
    );
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-test:streamGenerateContent")
                .query_param("alt", "sse");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(sse);
        })
        .await;

    let client = GeminiClient::new(&server.base_url(), "test-key");
    let (tx, mut rx) = mpsc::channel::<AppEvent>(8);
    let message = client
        .chat("gemini-test", &history(), &[], true, tx)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(message.content, "The Chiefs won 27-24.");

    let mut chunks = Vec::new();
    let mut ended = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            AppEvent::AgentStreamChunk(chunk) => chunks.push(chunk),
            AppEvent::AgentStreamEnd => ended = true,
            other => panic!("unexpected event {:?}", other),
        }
    }
    assert_eq!(chunks, vec!["The Chiefs ", "won 27-24."]);
    assert!(ended);
}

/// Serve one SSE response over a raw socket, pausing between `parts` so each
/// arrives as its own network read.
async fn serve_split_stream(parts: Vec<Vec<u8>>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let body_len = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + body_len {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        for part in parts {
            socket.write_all(&part).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        }
        socket.shutdown().await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_chat_streaming_keeps_characters_split_across_reads() {
    let event =
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Touchdown 🏈 é\"}]}}]}\n\n"
            .as_bytes()
            .to_vec();
    let football = event
        .windows(4)
        .position(|w| w == "🏈".as_bytes())
        .unwrap();
    let (head, tail) = event.split_at(football + 2);

    let base_url = serve_split_stream(vec![head.to_vec(), tail.to_vec()]).await;
    let client = GeminiClient::new(&base_url, "test-key");
    let (tx, _rx) = mpsc::channel::<AppEvent>(8);
    let message = client
        .chat("gemini-test", &history(), &[], true, tx)
        .await
        .unwrap();

    assert_eq!(message.content, "Touchdown 🏈 é");
}

#[tokio::test]
async fn test_chat_rate_limited() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-test:generateContent");
            then.status(429).json_body(json!({
                "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
            }));
        })
        .await;

    let client = GeminiClient::new(&server.base_url(), "test-key");
    let (tx, _rx) = mpsc::channel::<AppEvent>(8);
    let error = client
        .chat("gemini-test", &history(), &[], false, tx)
        .await
        .unwrap_err();

    assert!(is_rate_limited(&error));
}

#[tokio::test]
async fn test_chat_server_error_is_not_rate_limit() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-test:generateContent");
            then.status(500).body("boom");
        })
        .await;

    let client = GeminiClient::new(&server.base_url(), "test-key");
    let (tx, _rx) = mpsc::channel::<AppEvent>(8);
    let error = client
        .chat("gemini-test", &history(), &[], false, tx)
        .await
        .unwrap_err();

    assert!(!is_rate_limited(&error));
    assert!(error.to_string().contains("500"));
}
