//! Live NFL data: routing, fetching and summarizing.

pub mod client;
pub mod intent;
pub mod summary;
pub mod teams;

use client::StatsClient;
use intent::{DataNeed, LeaderCategory};
use tracing::{info, warn};

pub const LIVE_DATA_UNAVAILABLE: &str =
    "Live NFL data could not be fetched right now; answer from general knowledge and say so.";

/// Fetch-and-summarize facade shared by the keyword router and the tools.
#[derive(Debug, Clone)]
pub struct LiveData {
    client: StatsClient,
}

impl LiveData {
    pub fn new(client: StatsClient) -> Self {
        Self { client }
    }

    pub async fn scoreboard(&self) -> anyhow::Result<String> {
        let json = self.client.fetch_scoreboard().await?;
        Ok(summary::summarize_scoreboard(&json))
    }

    pub async fn leaders(&self, category: LeaderCategory) -> anyhow::Result<String> {
        let json = self.client.fetch_leaders(category).await?;
        Ok(summary::summarize_leaders(&json, category))
    }

    pub async fn team(&self, abbreviation: &str) -> anyhow::Result<String> {
        let json = self.client.fetch_team(abbreviation).await?;
        Ok(summary::summarize_team(&json))
    }

    pub async fn players(&self, query: &str) -> anyhow::Result<String> {
        let json = self.client.search_players(query).await?;
        Ok(summary::summarize_player_search(&json))
    }

    /// Context text for a routed question. `None` means no fetch was needed;
    /// a failed fetch still yields the fixed unavailable line.
    pub async fn context_for(&self, need: &DataNeed) -> Option<String> {
        let result = match need {
            DataNeed::None => return None,
            DataNeed::Scoreboard => self.scoreboard().await,
            DataNeed::Leaders(category) => self.leaders(*category).await,
            DataNeed::TeamStats(team) => self.team(team.abbreviation).await,
            DataNeed::PlayerSearch(query) => self.players(query).await,
        };

        match result {
            Ok(context) => {
                info!("Fetched live data for {:?} ({} chars)", need, context.len());
                Some(context)
            }
            Err(e) => {
                warn!("Live data fetch for {:?} failed: {:#}", need, e);
                Some(LIVE_DATA_UNAVAILABLE.to_string())
            }
        }
    }
}
