use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gridiron-agent",
    about = "Chat about the NFL with a hosted LLM, backed by live stats"
)]
pub struct Args {
    /// How the assistant decides when to pull live data
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Override the model name
    #[arg(long)]
    pub model: Option<String>,

    /// Path to a JSON, YAML or TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_stream: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plain conversation, no live data
    Plain,
    /// Every question carries the current scoreboard
    Enriched,
    /// Keyword routing picks the live fetch
    Routed,
    /// Routed, with canned answers when rate-limited
    Resilient,
    /// The model requests live data through function calls
    #[default]
    Tools,
}

impl Mode {
    pub fn always_enriches(&self) -> bool {
        matches!(self, Mode::Enriched)
    }

    pub fn routes_intent(&self) -> bool {
        matches!(self, Mode::Routed | Mode::Resilient)
    }

    pub fn uses_fallback(&self) -> bool {
        matches!(self, Mode::Resilient | Mode::Tools)
    }

    pub fn uses_tools(&self) -> bool {
        matches!(self, Mode::Tools)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Plain => "plain chat",
            Mode::Enriched => "scoreboard-enriched chat",
            Mode::Routed => "keyword-routed live data",
            Mode::Resilient => "keyword-routed live data with offline fallback",
            Mode::Tools => "tool-calling live data with offline fallback",
        }
    }

    pub fn parse_name(name: &str) -> Option<Self> {
        <Mode as ValueEnum>::from_str(name.trim(), true).ok()
    }
}
