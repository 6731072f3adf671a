pub mod client;
pub mod error;
pub mod gemini;

use crate::config::LLMConfig;
use anyhow::Result;
use client::LlmClient;
use gemini::GeminiClient;

pub fn llm_client_factory(config: &LLMConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("The gemini provider requires an API key"))?;
            Ok(Box::new(GeminiClient::new(&config.api_base, api_key)))
        }
        provider => Err(anyhow::anyhow!("Unsupported LLM provider: {}", provider)),
    }
}
