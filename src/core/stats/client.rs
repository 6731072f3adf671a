use crate::config::StatsConfig;
use crate::core::stats::intent::LeaderCategory;
use anyhow::Context;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Thin HTTP client over the public NFL stats endpoints. Every call returns the
/// raw JSON body; shaping it is left to the summarizers.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    config: StatsConfig,
}

impl StatsClient {
    pub fn new(config: &StatsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|error| {
                warn!(
                    "Failed to build stats client with timeout, falling back to default client: {}",
                    error
                );
                Client::new()
            });

        Self {
            client,
            config: config.clone(),
        }
    }

    pub async fn fetch_scoreboard(&self) -> anyhow::Result<Value> {
        let url = format!("{}/scoreboard", base(&self.config.site_api_base));
        self.get_json(&url, &[]).await
    }

    pub async fn fetch_leaders(&self, category: LeaderCategory) -> anyhow::Result<Value> {
        let url = format!("{}/leaders", base(&self.config.leaders_api_base));
        debug!("Fetching {} leaders", category);
        self.get_json(&url, &[("category", category.api_name())]).await
    }

    pub async fn fetch_team(&self, abbreviation: &str) -> anyhow::Result<Value> {
        let url = format!(
            "{}/teams/{}",
            base(&self.config.site_api_base),
            abbreviation.to_lowercase()
        );
        self.get_json(&url, &[]).await
    }

    pub async fn search_players(&self, query: &str) -> anyhow::Result<Value> {
        let url = format!("{}/search", base(&self.config.search_api_base));
        self.get_json(
            &url,
            &[
                ("query", query),
                ("type", "player"),
                ("sport", "football"),
                ("league", "nfl"),
                ("limit", "5"),
            ],
        )
        .await
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
        info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to reach stats API at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Stats API returned {} for {}",
                status,
                url
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("Stats API at {} returned invalid JSON", url))
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}
