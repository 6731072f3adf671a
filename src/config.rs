//! Configuration management for gridiron-agent.
//!
//! Settings are layered: built-in defaults, an optional config file,
//! environment variables, then command line flags.

use crate::cli::{Args, Mode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SUPPORTED_PROVIDERS: &[&str] = &["gemini"];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LLMConfig,

    /// Live statistics API configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Routing mode
    #[serde(default)]
    pub mode: Mode,

    /// Upper bound on tool-call round trips within a single turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            stats: StatsConfig::default(),
            mode: Mode::default(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Normally supplied through `API_KEY` rather than a file
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_stream")]
    pub stream: bool,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            system_prompt: default_system_prompt(),
            stream: default_stream(),
        }
    }
}

/// Live statistics API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsConfig {
    /// Base for scoreboard and team endpoints
    #[serde(default = "default_site_api_base")]
    pub site_api_base: String,

    /// Base for the league leaders endpoint
    #[serde(default = "default_leaders_api_base")]
    pub leaders_api_base: String,

    /// Base for the athlete search endpoint
    #[serde(default = "default_search_api_base")]
    pub search_api_base: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            site_api_base: default_site_api_base(),
            leaders_api_base: default_leaders_api_base(),
            search_api_base: default_search_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub fn default_provider() -> String {
    "gemini".to_string()
}

pub fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

pub fn default_system_prompt() -> String {
    "You are a friendly helpful sports AI. You respond in clear, normal conversational English. \
     You specialize in the NFL. Answer questions directly, explain thinking simply, and avoid \
     role-playing or pirate language. When live NFL data is provided, prefer it over your own \
     memory and say when the data does not answer the question."
        .to_string()
}

pub fn default_stream() -> bool {
    true
}

pub fn default_site_api_base() -> String {
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl".to_string()
}

pub fn default_leaders_api_base() -> String {
    "https://site.api.espn.com/apis/site/v3/sports/football/nfl".to_string()
}

pub fn default_search_api_base() -> String {
    "https://site.web.api.espn.com/apis/common/v3".to_string()
}

pub fn default_timeout_secs() -> u64 {
    10
}

pub fn default_max_tool_rounds() -> usize {
    4
}

impl AppConfig {
    /// Create a new configuration from a file path (auto-detect format by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to parse JSON config file '{}': {}",
                    path.display(),
                    e
                )
            })?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to parse YAML config file '{}': {}",
                    path.display(),
                    e
                )
            })?,
            Some("toml") => toml::from_str(&content).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to parse TOML config file '{}': {}",
                    path.display(),
                    e
                )
            })?,
            Some(ext) => {
                return Err(anyhow::anyhow!(
                    "Unsupported config format: {} (file: {})",
                    ext,
                    path.display()
                ));
            }
            None => {
                return Err(anyhow::anyhow!(
                    "Config file has no extension, cannot determine format: {}",
                    path.display()
                ));
            }
        };

        Ok(config)
    }

    /// Apply environment overrides. `lookup` is usually `std::env::var(..).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_blank("API_KEY").or_else(|| non_blank("GEMINI_API_KEY")) {
            self.llm.api_key = Some(key.trim().to_string());
        }
        if let Some(model) = non_blank("NFL_AGENT_MODEL") {
            self.llm.model = model.trim().to_string();
        }
        if let Some(mode) = non_blank("NFL_AGENT_MODE") {
            match Mode::parse_name(&mode) {
                Some(mode) => self.mode = mode,
                None => tracing::warn!("Ignoring unknown NFL_AGENT_MODE '{}'", mode),
            }
        }
    }

    /// Apply command line overrides. The config file itself is read by the caller.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(model) = &args.model {
            self.llm.model = model.clone();
        }
        if args.no_stream {
            self.llm.stream = false;
        }
    }

    /// Build the effective configuration for a run.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn api_key(&self) -> anyhow::Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("No API key configured; set API_KEY in the environment or a .env file")
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.api_key()?;

        if !SUPPORTED_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(anyhow::anyhow!(
                "Unsupported LLM provider: {}",
                self.llm.provider
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(anyhow::anyhow!("Model name cannot be empty"));
        }

        for (name, url) in [
            ("llm.api_base", &self.llm.api_base),
            ("stats.site_api_base", &self.stats.site_api_base),
            ("stats.leaders_api_base", &self.stats.leaders_api_base),
            ("stats.search_api_base", &self.stats.search_api_base),
        ] {
            if url.trim().is_empty() {
                return Err(anyhow::anyhow!("{} cannot be empty", name));
            }
        }

        if self.stats.timeout_secs == 0 {
            return Err(anyhow::anyhow!("stats.timeout_secs must be greater than 0"));
        }

        if self.max_tool_rounds == 0 {
            return Err(anyhow::anyhow!("max_tool_rounds must be greater than 0"));
        }

        Ok(())
    }
}
