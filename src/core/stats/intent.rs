//! Keyword routing from a user question to the live data it needs.

use crate::core::stats::teams::{self, Team};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderCategory {
    Passing,
    Rushing,
    Receiving,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 3] = [Self::Passing, Self::Rushing, Self::Receiving];

    /// Category key used by the leaders endpoint
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Passing => "passingYards",
            Self::Rushing => "rushingYards",
            Self::Receiving => "receivingYards",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Passing => "passing",
            Self::Rushing => "rushing",
            Self::Receiving => "receiving",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| lowered == category.label() || lowered == category.api_name().to_lowercase())
    }
}

impl fmt::Display for LeaderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The live fetch a question calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataNeed {
    Scoreboard,
    Leaders(LeaderCategory),
    TeamStats(Team),
    PlayerSearch(String),
    None,
}

static LEADER_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(leaders?|leading|leads|most|top|best|highest|ranks?|rankings?)\b")
        .expect("leader hint pattern")
});

static PASSING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(passing|passers?|quarterbacks?|qbs?|throwing|throws)\b").expect("passing pattern")
});

static RUSHING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(rushing|rushers?|running ?backs?|rbs?|carries)\b").expect("rushing pattern")
});

static RECEIVING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(receiving|receivers?|wrs?|receptions|catches|tight ends?)\b")
        .expect("receiving pattern")
});

static SCOREBOARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(scores?|scoreboard|who won|who's winning|who is winning|tonight|today|this week|live|matchups?|schedule|games?)\b",
    )
    .expect("scoreboard pattern")
});

static PLAYER_LOOKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:who is|who's|stats for|statistics for|numbers for|tell me about|how is|how's|info on|look up)\s+(.+)",
    )
    .expect("player lookup pattern")
});

static TRAILING_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(playing|doing|performing|this season|this year|lately|so far)$")
        .expect("trailing filler pattern")
});

/// Words that never make up a player's name on their own.
const STOP_WORDS: [&str; 34] = [
    "it", "its", "it's", "you", "your", "you're", "yours", "that", "this", "these", "those",
    "things", "thing", "he", "she", "they", "them", "we", "me", "my", "i", "a", "an", "the", "of",
    "all", "time", "day", "going", "up", "there", "here", "what", "everyone",
];

/// Decide which live data, if any, would help answer `text`.
///
/// Checks run in a fixed order: stat leaders, scoreboard, team, player search.
pub fn classify(text: &str) -> DataNeed {
    let text = text.trim();
    if text.is_empty() {
        return DataNeed::None;
    }

    if LEADER_HINT.is_match(text) {
        if PASSING.is_match(text) {
            return DataNeed::Leaders(LeaderCategory::Passing);
        }
        if RUSHING.is_match(text) {
            return DataNeed::Leaders(LeaderCategory::Rushing);
        }
        if RECEIVING.is_match(text) {
            return DataNeed::Leaders(LeaderCategory::Receiving);
        }
    }

    if SCOREBOARD.is_match(text) {
        return DataNeed::Scoreboard;
    }

    if let Some(team) = teams::find_team(text) {
        return DataNeed::TeamStats(team);
    }

    match player_query(text) {
        Some(query) => DataNeed::PlayerSearch(query),
        None => DataNeed::None,
    }
}

/// Pull a player name out of phrases like "tell me about Josh Allen".
pub fn player_query(text: &str) -> Option<String> {
    let captured = PLAYER_LOOKUP.captures(text)?.get(1)?.as_str();

    let mut query = captured
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_string();
    while let Some(found) = TRAILING_FILLER.find(&query) {
        query.truncate(found.start());
    }

    let query = query
        .strip_prefix("the ")
        .or_else(|| query.strip_prefix("The "))
        .unwrap_or(&query)
        .trim();

    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() || words.len() > 5 {
        return None;
    }

    // Names are capitalised; small talk like "how's it going" is not.
    let capitalised = words
        .iter()
        .any(|word| word.chars().next().is_some_and(char::is_uppercase));
    let only_filler = words
        .iter()
        .all(|word| STOP_WORDS.contains(&word.to_lowercase().as_str()));
    if !capitalised || only_filler {
        return None;
    }

    Some(query.to_string())
}
