use crate::{
    core::llm::client::LlmClient,
    types::{AppEvent, ChatMessage, Tool},
};
use tokio::sync::mpsc;
use tracing::info;

/// A chat session: the model to talk to and the running conversation.
#[derive(Debug, Clone)]
pub struct Agent {
    pub model: String,
    pub history: Vec<ChatMessage>,
    system_prompt: String,
}

impl Agent {
    pub fn new(model: &str, system_prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            history: vec![ChatMessage::system(system_prompt)],
            system_prompt: system_prompt.to_string(),
        }
    }

    pub fn add_user_message(&mut self, content: &str) {
        self.history.push(ChatMessage::user(content));
    }

    pub fn add_assistant_message(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    pub fn add_tool_result(&mut self, tool_name: &str, output: &str) {
        self.history.push(ChatMessage::tool_result(tool_name, output));
    }

    /// Drop everything after the first `len` messages. The system prompt is kept.
    pub fn truncate(&mut self, len: usize) {
        self.history.truncate(len.max(1));
    }

    pub fn reset(&mut self) {
        self.history = vec![ChatMessage::system(&self.system_prompt)];
    }

    pub async fn chat(
        &mut self,
        client: &dyn LlmClient,
        tools: &[Tool],
        stream: bool,
        tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<ChatMessage> {
        info!("=== AGENT CHAT START ===");
        info!("Agent model: {}", self.model);
        info!("History contains {} messages", self.history.len());
        for (i, tool) in tools.iter().enumerate() {
            info!(
                "  {}. Tool: {} - {}",
                i + 1,
                tool.function.name,
                tool.truncated_description()
            );
        }

        let response = client
            .chat(&self.model, &self.history, tools, stream, tx)
            .await?;
        self.add_assistant_message(response.clone());

        info!("=== AGENT CHAT END ===");
        Ok(response)
    }
}
