use crate::{
    core::llm::{client::LlmClient, error::LlmError},
    types::{AppEvent, ChatMessage, Tool, ToolCall},
};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct GeminiClient {
    pub client: Client,
    pub api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|error| {
                warn!(
                    "Failed to build reqwest client with timeout, falling back to default client: {}",
                    error
                );
                Client::new()
            });

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, model: &str, stream: bool) -> String {
        if stream {
            format!(
                "{}/models/{}:streamGenerateContent?alt=sse",
                self.api_base, model
            )
        } else {
            format!("{}/models/{}:generateContent", self.api_base, model)
        }
    }

    async fn read_streaming(
        &self,
        response: Response,
        tx: &mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<ChatMessage> {
        let mut content = String::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();
        let mut stream = response.bytes_stream();
        // Raw bytes: a multi-byte character may straddle two network chunks.
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk_data = chunk.map_err(LlmError::Transport)?;
            trace!("Received {} bytes from Gemini stream", chunk_data.len());
            buffer.extend_from_slice(&chunk_data);

            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let raw_line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                let line = String::from_utf8_lossy(&raw_line);
                let Some(data) = line.trim().strip_prefix("data:") else {
                    continue;
                };

                debug!("Received streaming event: {}", data.trim());
                let parsed: Value = match serde_json::from_str(data.trim()) {
                    Ok(p) => p,
                    Err(e) => {
                        error!("Error parsing SSE payload: '{}', error: {}", data, e);
                        continue;
                    }
                };

                if parsed["error"].is_object() {
                    let code = parsed["error"]["code"]
                        .as_u64()
                        .and_then(|c| u16::try_from(c).ok())
                        .and_then(|c| StatusCode::from_u16(c).ok())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    let api_status = parsed["error"]["status"].as_str().unwrap_or_default();
                    return Err(api_error_from_body(code, &parsed, api_status).into());
                }

                let (text, calls) = parse_parts(&parsed);
                if !text.is_empty() {
                    if tx
                        .send(AppEvent::AgentStreamChunk(text.clone()))
                        .await
                        .is_err()
                    {
                        error!("Failed to send stream chunk to the interface");
                    }
                    content.push_str(&text);
                }
                tool_calls.extend(calls);
            }
        }

        if tx.send(AppEvent::AgentStreamEnd).await.is_err() {
            error!("Failed to send stream end to the interface");
        }

        if content.is_empty() && tool_calls.is_empty() {
            return Err(LlmError::MalformedResponse("stream ended without content".into()).into());
        }

        Ok(into_message(content, tool_calls))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat(
        &self,
        model: &str,
        history: &[ChatMessage],
        tools: &[Tool],
        stream: bool,
        tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<ChatMessage> {
        info!("=== GEMINI REQUEST START ===");
        info!("Model: {}", model);
        info!("History length: {} messages", history.len());
        info!("Streaming: {}", stream);
        if !tools.is_empty() {
            info!("Offering {} tools", tools.len());
        }

        let request_body = build_request_body(history, tools);
        trace!(
            "Request body: {}",
            serde_json::to_string(&request_body).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.endpoint(model, stream))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Gemini: {}", e);
                LlmError::Transport(e)
            })?;

        let status = response.status();
        info!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = error_from_status(status, &body);
            error!("=== GEMINI REQUEST FAILED === {}", error);
            return Err(error.into());
        }

        let message = if stream {
            self.read_streaming(response, &tx).await?
        } else {
            let json: Value = response.json().await.map_err(LlmError::Transport)?;
            debug!(
                "Full JSON response: {}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
            parse_response(&json)?
        };

        info!("=== GEMINI RESPONSE END ===");
        Ok(message)
    }
}

/// Translate chat history and tools into a `generateContent` request.
///
/// System messages become `systemInstruction`, `assistant` turns use the
/// `model` role, and consecutive tool results are merged into a single
/// `user` turn of `functionResponse` parts.
pub fn build_request_body(history: &[ChatMessage], tools: &[Tool]) -> Value {
    let mut system_parts: Vec<Value> = Vec::new();
    let mut contents: Vec<Value> = Vec::new();
    let mut pending_responses: Vec<Value> = Vec::new();

    for message in history {
        if message.role != "tool" && !pending_responses.is_empty() {
            contents.push(json!({ "role": "user", "parts": std::mem::take(&mut pending_responses) }));
        }

        match message.role.as_str() {
            "system" => system_parts.push(json!({ "text": message.content })),
            "tool" => pending_responses.push(json!({
                "functionResponse": {
                    "name": message.tool_name.as_deref().unwrap_or_default(),
                    "response": { "content": message.content },
                }
            })),
            "assistant" => {
                let mut parts = Vec::new();
                if !message.content.is_empty() {
                    parts.push(json!({ "text": message.content }));
                }
                for call in message.tool_calls.iter().flatten() {
                    let mut part = json!({
                        "functionCall": {
                            "name": call.function.name,
                            "args": call.function.arguments,
                        }
                    });
                    if let Some(signature) = &call.thought_signature {
                        part["thoughtSignature"] = json!(signature);
                    }
                    parts.push(part);
                }
                if !parts.is_empty() {
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
            }
            _ => contents.push(json!({
                "role": "user",
                "parts": [{ "text": message.content }],
            })),
        }
    }

    if !pending_responses.is_empty() {
        contents.push(json!({ "role": "user", "parts": pending_responses }));
    }

    let mut body = json!({ "contents": contents });

    if !system_parts.is_empty() {
        body["systemInstruction"] = json!({ "parts": system_parts });
    }

    if !tools.is_empty() {
        let declarations: Vec<Value> = tools
            .iter()
            .map(|tool| {
                let mut declaration = json!({
                    "name": tool.function.name,
                    "description": tool.function.description,
                });
                // Gemini rejects an object schema without properties; omit it for no-arg tools.
                let has_properties = tool.function.parameters["properties"]
                    .as_object()
                    .is_some_and(|p| !p.is_empty());
                if has_properties {
                    declaration["parameters"] = tool.function.parameters.clone();
                }
                declaration
            })
            .collect();
        body["tools"] = json!([{ "functionDeclarations": declarations }]);
    }

    body
}

/// Parse a complete `generateContent` response.
pub fn parse_response(json: &Value) -> Result<ChatMessage, LlmError> {
    let Some(candidates) = json["candidates"].as_array().filter(|c| !c.is_empty()) else {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(LlmError::Blocked {
                reason: reason.to_string(),
            });
        }
        return Err(LlmError::MalformedResponse(
            "response has no candidates".to_string(),
        ));
    };

    let (content, tool_calls) = parse_parts(json);
    if content.is_empty() && tool_calls.is_empty() {
        let finish = candidates[0]["finishReason"].as_str().unwrap_or("UNKNOWN");
        return Err(LlmError::MalformedResponse(format!(
            "candidate has no text or function call (finishReason {})",
            finish
        )));
    }

    Ok(into_message(content, tool_calls))
}

fn parse_parts(json: &Value) -> (String, Vec<ToolCall>) {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    let parts = json["candidates"][0]["content"]["parts"].as_array();
    for part in parts.into_iter().flatten() {
        if part["thought"].as_bool().unwrap_or(false) {
            continue;
        }
        if let Some(t) = part["text"].as_str() {
            text.push_str(t);
        }
        if let Some(name) = part["functionCall"]["name"].as_str() {
            let args = match &part["functionCall"]["args"] {
                Value::Null => json!({}),
                args => args.clone(),
            };
            debug!("Tool call: {} with args: {}", name, args);
            let mut call = ToolCall::new(name, args);
            call.thought_signature = part["thoughtSignature"].as_str().map(str::to_string);
            tool_calls.push(call);
        }
    }

    (text, tool_calls)
}

fn into_message(content: String, tool_calls: Vec<ToolCall>) -> ChatMessage {
    if tool_calls.is_empty() {
        ChatMessage::assistant(&content)
    } else {
        info!("Response contains {} tool calls", tool_calls.len());
        ChatMessage::tool_call(&content, tool_calls)
    }
}

/// Map a non-success HTTP response to an [`LlmError`].
pub fn error_from_status(status: StatusCode, body: &str) -> LlmError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let api_status = parsed["error"]["status"].as_str().unwrap_or_default();
    let mut error = api_error_from_body(status, &parsed, api_status);

    // Non-JSON error bodies still carry something readable.
    if let LlmError::RateLimited { message } | LlmError::Api { message, .. } = &mut error {
        if message.is_empty() {
            let trimmed = body.trim();
            *message = if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                trimmed.chars().take(300).collect()
            };
        }
    }

    error
}

fn api_error_from_body(status: StatusCode, parsed: &Value, api_status: &str) -> LlmError {
    let message = parsed["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    if status == StatusCode::TOO_MANY_REQUESTS || api_status == "RESOURCE_EXHAUSTED" {
        LlmError::RateLimited { message }
    } else {
        LlmError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
