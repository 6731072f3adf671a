use crate::cli::Mode;
use crate::config::AppConfig;
use crate::core::agents::Agent;
use crate::core::fallback;
use crate::core::llm::{client::LlmClient, error::is_rate_limited};
use crate::core::stats::{LiveData, intent};
use crate::core::tools::ToolRegistry;
use crate::types::{AppEvent, ChatMessage, ToolCall};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-run knobs for how a turn is handled.
#[derive(Debug, Clone, Copy)]
pub struct TurnSettings {
    pub mode: Mode,
    pub stream: bool,
    pub max_tool_rounds: usize,
}

impl From<&AppConfig> for TurnSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            mode: config.mode,
            stream: config.llm.stream,
            max_tool_rounds: config.max_tool_rounds,
        }
    }
}

/// Wrap a question with the live data fetched for it.
pub fn build_prompt(question: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "Live NFL data (fetched just now):\n{}\n\nQuestion: {}",
            context, question
        ),
        None => question.to_string(),
    }
}

pub struct Orchestrator {
    agent: Agent,
    llm: Box<dyn LlmClient>,
    live: LiveData,
    tool_registry: ToolRegistry,
    settings: TurnSettings,
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
}

impl Orchestrator {
    pub fn new(
        agent: Agent,
        llm: Box<dyn LlmClient>,
        live: LiveData,
        settings: TurnSettings,
        tx: mpsc::Sender<AppEvent>,
        rx: mpsc::Receiver<AppEvent>,
    ) -> Self {
        let tool_registry = if settings.mode.uses_tools() {
            ToolRegistry::with_live_data(&live)
        } else {
            ToolRegistry::new()
        };

        Self {
            agent,
            llm,
            live,
            tool_registry,
            settings,
            tx,
            rx,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        llm: Box<dyn LlmClient>,
        live: LiveData,
        tx: mpsc::Sender<AppEvent>,
        rx: mpsc::Receiver<AppEvent>,
    ) -> Self {
        let agent = Agent::new(&config.llm.model, &config.llm.system_prompt);
        Self::new(agent, llm, live, TurnSettings::from(config), tx, rx)
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Orchestrator running in {} mode", self.settings.mode.label());
        while let Some(event) = self.rx.recv().await {
            match event {
                AppEvent::UserInput(input) => {
                    if let Err(e) = self.handle_user_input(&input).await {
                        self.tx.send(AppEvent::Error(format!("{:#}", e))).await?;
                    }
                }
                AppEvent::ResetConversation => {
                    self.agent.reset();
                    self.tx
                        .send(AppEvent::AgentMessage(
                            "Conversation cleared. What would you like to talk about?".to_string(),
                        ))
                        .await?;
                }
                _ => continue,
            }
            self.tx.send(AppEvent::TurnComplete).await?;
        }
        Ok(())
    }

    /// Run one turn. A failed turn is rolled back out of the history; rate
    /// limits in fallback-enabled modes are answered from the canned bank.
    pub async fn handle_user_input(&mut self, input: &str) -> anyhow::Result<()> {
        let mark = self.agent.history.len();

        let context = self.gather_context(input).await;
        self.agent
            .add_user_message(&build_prompt(input, context.as_deref()));

        let result = if self.settings.mode.uses_tools() {
            self.chat_with_tools().await
        } else {
            self.chat_once().await
        };

        let Err(error) = result else {
            return Ok(());
        };
        self.agent.truncate(mark);

        if self.settings.mode.uses_fallback() && is_rate_limited(&error) {
            warn!("Model rate limited, answering from the fallback bank: {}", error);
            self.tx
                .send(AppEvent::FallbackAnswer(fallback::answer(input).to_string()))
                .await?;
            return Ok(());
        }

        Err(error)
    }

    async fn gather_context(&self, input: &str) -> Option<String> {
        let mode = self.settings.mode;
        if mode.always_enriches() {
            return self.live.context_for(&intent::DataNeed::Scoreboard).await;
        }
        if mode.routes_intent() {
            let need = intent::classify(input);
            info!("Routed question to {:?}", need);
            return self.live.context_for(&need).await;
        }
        None
    }

    async fn chat_once(&mut self) -> anyhow::Result<()> {
        let response = self
            .agent
            .chat(self.llm.as_ref(), &[], self.settings.stream, self.tx.clone())
            .await?;
        self.show(&response).await
    }

    async fn chat_with_tools(&mut self) -> anyhow::Result<()> {
        let tool_definitions = self.tool_registry.definitions();

        for round in 1..=self.settings.max_tool_rounds {
            let response = self
                .agent
                .chat(
                    self.llm.as_ref(),
                    &tool_definitions,
                    self.settings.stream,
                    self.tx.clone(),
                )
                .await?;

            let tool_calls = match &response.tool_calls {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => return self.show(&response).await,
            };

            if !response.content.trim().is_empty() {
                self.show(&response).await?;
            }

            info!("Round {}: model requested {} tool(s)", round, tool_calls.len());
            self.tx
                .send(AppEvent::ToolRequest(tool_calls.clone()))
                .await?;

            for tool_call in &tool_calls {
                let output = self.execute_tool(tool_call).await;
                self.tx
                    .send(AppEvent::ToolResult(
                        tool_call.function.name.clone(),
                        output.clone(),
                    ))
                    .await?;
                self.agent
                    .add_tool_result(&tool_call.function.name, &output);
            }
        }

        Err(anyhow::anyhow!(
            "The model was still requesting live data after {} rounds",
            self.settings.max_tool_rounds
        ))
    }

    /// Tool failures are reported back to the model as text rather than
    /// failing the turn.
    async fn execute_tool(&self, tool_call: &ToolCall) -> String {
        let name = &tool_call.function.name;
        let Some(tool) = self.tool_registry.get_tool(name) else {
            warn!("Model requested unknown tool '{}'", name);
            return format!("Error: Unknown tool: {}", name);
        };

        match tool.execute(&tool_call.function.arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool '{}' failed: {:#}", name, e);
                format!("Error: {:#}", e)
            }
        }
    }

    async fn show(&self, response: &ChatMessage) -> anyhow::Result<()> {
        // Streamed replies were already delivered chunk by chunk.
        if !self.settings.stream {
            self.tx
                .send(AppEvent::AgentMessage(response.content.clone()))
                .await?;
        }
        Ok(())
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.agent.history
    }
}
