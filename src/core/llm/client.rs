use crate::types::{AppEvent, ChatMessage, Tool};
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;

/// Trait defining the interface for LLM clients.
/// The agent talks to the hosted model only through this seam, which also lets
/// tests script replies without a network.
#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    /// Send a chat request to the LLM.
    ///
    /// # Arguments
    /// * `model` - The model to use (e.g., "gemini-3-flash-preview")
    /// * `history` - The conversation history, system prompt first
    /// * `tools` - Functions the model may call; empty disables function calling
    /// * `stream` - Whether to stream the response
    /// * `tx` - Channel for stream chunks
    ///
    /// # Returns
    /// The assistant's reply, holding text and/or tool calls. Failures are
    /// [`LlmError`](super::error::LlmError) values wrapped in `anyhow::Error`.
    async fn chat(
        &self,
        model: &str,
        history: &[ChatMessage],
        tools: &[Tool],
        stream: bool,
        tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<ChatMessage>;
}
