use crate::core::stats::{LiveData, intent::LeaderCategory, teams};
use crate::types::Tool as ApiTool;
use async_trait::async_trait;
use serde_json::{Value, json};

// The main trait for any function the model can call.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> String;
    fn description(&self) -> String;
    fn parameters(&self) -> Value;
    async fn execute(&self, args: &Value) -> anyhow::Result<String>;

    // Provides the full tool definition sent to the model.
    fn definition(&self) -> ApiTool {
        ApiTool::new(&self.name(), &self.description(), self.parameters())
    }
}

// A registry to hold all available tools.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding every live-data tool.
    pub fn with_live_data(live: &LiveData) -> Self {
        let mut registry = Self::new();
        registry.add_tool(Box::new(ScoreboardTool::new(live.clone())));
        registry.add_tool(Box::new(StatLeadersTool::new(live.clone())));
        registry.add_tool(Box::new(TeamStatsTool::new(live.clone())));
        registry.add_tool(Box::new(PlayerSearchTool::new(live.clone())));
        registry
    }

    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn definitions(&self) -> Vec<ApiTool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("'{}' argument is required", key))
}

// Current week's games and scores.
pub struct ScoreboardTool {
    live: LiveData,
}

impl ScoreboardTool {
    pub fn new(live: LiveData) -> Self {
        Self { live }
    }
}

#[async_trait]
impl Tool for ScoreboardTool {
    fn name(&self) -> String {
        "get_scoreboard".to_string()
    }

    fn description(&self) -> String {
        "Get this week's NFL games with live or final scores and game status".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: &Value) -> anyhow::Result<String> {
        self.live.scoreboard().await
    }
}

// League leaders for a stat category.
pub struct StatLeadersTool {
    live: LiveData,
}

impl StatLeadersTool {
    pub fn new(live: LiveData) -> Self {
        Self { live }
    }
}

#[async_trait]
impl Tool for StatLeadersTool {
    fn name(&self) -> String {
        "get_stat_leaders".to_string()
    }

    fn description(&self) -> String {
        "Get the current NFL top five in passing, rushing or receiving yards".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": ["passing", "rushing", "receiving"],
                    "description": "The stat category to rank players by"
                }
            },
            "required": ["category"]
        })
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<String> {
        let name = required_str(args, "category")?;
        let category = LeaderCategory::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown stat category '{}'", name))?;
        self.live.leaders(category).await
    }
}

// Record, standing and next game for one team.
pub struct TeamStatsTool {
    live: LiveData,
}

impl TeamStatsTool {
    pub fn new(live: LiveData) -> Self {
        Self { live }
    }
}

#[async_trait]
impl Tool for TeamStatsTool {
    fn name(&self) -> String {
        "get_team_stats".to_string()
    }

    fn description(&self) -> String {
        "Get an NFL team's current record, division standing and next game".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "team": {
                    "type": "string",
                    "description": "Team name, nickname or abbreviation, e.g. 'Chiefs' or 'KC'"
                }
            },
            "required": ["team"]
        })
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<String> {
        let name = required_str(args, "team")?;
        let team = teams::lookup(name).ok_or_else(|| anyhow::anyhow!("Unknown NFL team '{}'", name))?;
        self.live.team(team.abbreviation).await
    }
}

// Player lookup by name.
pub struct PlayerSearchTool {
    live: LiveData,
}

impl PlayerSearchTool {
    pub fn new(live: LiveData) -> Self {
        Self { live }
    }
}

#[async_trait]
impl Tool for PlayerSearchTool {
    fn name(&self) -> String {
        "search_player".to_string()
    }

    fn description(&self) -> String {
        "Look up NFL players by name and return their position and team".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Full or partial player name"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<String> {
        let name = required_str(args, "name")?;
        self.live.players(name).await
    }
}
