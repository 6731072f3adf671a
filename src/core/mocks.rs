//! Mock objects for testing without the hosted model.

use crate::core::llm::{client::LlmClient, error::LlmError};
use crate::types::{AppEvent, ChatMessage, Tool};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// One scripted outcome of a chat call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Message(ChatMessage),
    RateLimited,
    Fail(String),
}

/// What the client was asked on a single call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub history: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
    pub stream: bool,
}

/// Scripted LLM client. Clones share the same script and request log, so a
/// test can hand one clone to the code under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let client = Self::new();
        for reply in replies {
            client.push(reply);
        }
        client
    }

    pub fn push(&self, reply: MockReply) {
        lock(&self.replies).push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat(
        &self,
        model: &str,
        history: &[ChatMessage],
        tools: &[Tool],
        stream: bool,
        tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<ChatMessage> {
        lock(&self.requests).push(RecordedRequest {
            model: model.to_string(),
            history: history.to_vec(),
            tool_names: tools.iter().map(|t| t.function.name.clone()).collect(),
            stream,
        });

        let reply = lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::Message(ChatMessage::assistant("Default mock response")));

        match reply {
            MockReply::Message(message) => {
                if stream {
                    if !message.content.is_empty() {
                        tx.send(AppEvent::AgentStreamChunk(message.content.clone()))
                            .await?;
                    }
                    tx.send(AppEvent::AgentStreamEnd).await?;
                }
                Ok(message)
            }
            MockReply::RateLimited => Err(LlmError::RateLimited {
                message: "Resource has been exhausted (e.g. check quota).".to_string(),
            }
            .into()),
            MockReply::Fail(message) => Err(LlmError::Api {
                status: 500,
                message,
            }
            .into()),
        }
    }
}
