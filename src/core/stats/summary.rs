//! Compress raw stats JSON into a few lines of text for the model.
//!
//! Every function here is total: missing or oddly shaped fields degrade to a
//! placeholder or a fixed "unavailable" line rather than an error.

use crate::core::stats::intent::LeaderCategory;
use serde_json::Value;

pub const SCOREBOARD_UNAVAILABLE: &str = "Scoreboard data is unavailable right now.";
pub const NO_GAMES: &str = "No NFL games are on the scoreboard right now.";
pub const LEADERS_UNAVAILABLE: &str = "League leader data is unavailable right now.";
pub const TEAM_UNAVAILABLE: &str = "Team data is unavailable right now.";
pub const NO_PLAYERS: &str = "No matching NFL players were found.";

const MAX_GAMES: usize = 16;
const MAX_LEADERS: usize = 5;
const MAX_PLAYERS: usize = 5;

pub fn summarize_scoreboard(json: &Value) -> String {
    let Some(events) = json["events"].as_array() else {
        return SCOREBOARD_UNAVAILABLE.to_string();
    };
    if events.is_empty() {
        return NO_GAMES.to_string();
    }

    let mut lines = Vec::new();
    if let Some(week) = json["week"]["number"].as_u64() {
        match json["season"]["year"].as_u64() {
            Some(year) => lines.push(format!("NFL scoreboard, {} season, week {}:", year, week)),
            None => lines.push(format!("NFL scoreboard, week {}:", week)),
        }
    } else {
        lines.push("NFL scoreboard:".to_string());
    }

    lines.extend(events.iter().take(MAX_GAMES).map(summarize_game));
    if events.len() > MAX_GAMES {
        lines.push(format!("...and {} more games.", events.len() - MAX_GAMES));
    }

    lines.join("\n")
}

fn summarize_game(event: &Value) -> String {
    let status = text_or(&event["status"]["type"]["shortDetail"], "status unknown");
    let competitors = event["competitions"][0]["competitors"].as_array();

    let side = |home_away: &str| {
        competitors
            .into_iter()
            .flatten()
            .find(|c| c["homeAway"].as_str() == Some(home_away))
    };

    match (side("away"), side("home")) {
        (Some(away), Some(home)) => format!(
            "- {} {} @ {} {} ({})",
            team_abbreviation(&away["team"]),
            score(away),
            team_abbreviation(&home["team"]),
            score(home),
            status
        ),
        _ => format!("- {} ({})", text_or(&event["shortName"], "Unknown matchup"), status),
    }
}

fn score(competitor: &Value) -> String {
    match &competitor["score"] {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "-".to_string(),
    }
}

pub fn summarize_leaders(json: &Value, category: LeaderCategory) -> String {
    let Some(categories) = leader_categories(json) else {
        return LEADERS_UNAVAILABLE.to_string();
    };

    let wanted = category.api_name().to_lowercase();
    let Some(found) = categories.iter().find(|c| {
        c["name"].as_str().is_some_and(|n| n.to_lowercase() == wanted)
            || c["displayName"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(category.label()))
    }) else {
        return LEADERS_UNAVAILABLE.to_string();
    };

    let Some(leaders) = found["leaders"].as_array().filter(|l| !l.is_empty()) else {
        return LEADERS_UNAVAILABLE.to_string();
    };

    let title = text_or(&found["displayName"], category.label());
    let mut lines = vec![format!("NFL {} leaders:", title)];
    for (rank, leader) in leaders.iter().take(MAX_LEADERS).enumerate() {
        let athlete = &leader["athlete"];
        let team = if athlete["team"].is_object() {
            team_abbreviation(&athlete["team"])
        } else {
            team_abbreviation(&leader["team"])
        };
        let value = match (&leader["displayValue"], &leader["value"]) {
            (Value::String(s), _) if !s.is_empty() => s.clone(),
            (_, Value::Number(n)) => n.to_string(),
            _ => "n/a".to_string(),
        };
        lines.push(format!(
            "{}. {} ({}) - {}",
            rank + 1,
            text_or(&athlete["displayName"], "Unknown player"),
            team,
            value
        ));
    }

    lines.join("\n")
}

fn leader_categories(json: &Value) -> Option<&Vec<Value>> {
    json["leaders"]["categories"]
        .as_array()
        .or_else(|| json["categories"].as_array())
        .or_else(|| json["leaders"].as_array())
}

pub fn summarize_team(json: &Value) -> String {
    let team = &json["team"];
    let Some(name) = team["displayName"].as_str() else {
        return TEAM_UNAVAILABLE.to_string();
    };

    let record = team["record"]["items"]
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .find(|item| item["type"].as_str() == Some("total"))
                .or_else(|| items.first())
        })
        .and_then(|item| item["summary"].as_str());

    let mut summary = match record {
        Some(record) => format!("{}: record {}", name, record),
        None => format!("{}: record unavailable", name),
    };
    if let Some(standing) = team["standingSummary"].as_str() {
        summary.push_str(&format!(", {}", standing));
    }
    summary.push('.');

    if let Some(next) = team["nextEvent"].as_array().and_then(|events| events.first()) {
        let matchup = text_or(&next["shortName"], text_or(&next["name"], "TBD"));
        match next["date"].as_str() {
            Some(date) => summary.push_str(&format!(" Next game: {} on {}.", matchup, date)),
            None => summary.push_str(&format!(" Next game: {}.", matchup)),
        }
    }

    summary
}

pub fn summarize_player_search(json: &Value) -> String {
    let mut matches: Vec<String> = Vec::new();

    if let Some(items) = json["items"].as_array() {
        matches.extend(items.iter().filter_map(player_line));
    } else if let Some(results) = json["results"].as_array() {
        matches.extend(
            results
                .iter()
                .filter_map(|group| group["contents"].as_array())
                .flatten()
                .filter_map(player_line),
        );
    }

    if matches.is_empty() {
        return NO_PLAYERS.to_string();
    }

    let mut lines = vec!["Matching NFL players:".to_string()];
    lines.extend(matches.into_iter().take(MAX_PLAYERS).map(|m| format!("- {}", m)));
    lines.join("\n")
}

fn player_line(item: &Value) -> Option<String> {
    let name = item["displayName"].as_str()?;
    let detail = item["description"]
        .as_str()
        .or_else(|| item["subtitle"].as_str())
        .filter(|d| !d.is_empty());
    Some(match detail {
        Some(detail) => format!("{} ({})", name, detail),
        None => name.to_string(),
    })
}

fn team_abbreviation(team: &Value) -> &str {
    team["abbreviation"]
        .as_str()
        .or_else(|| team["displayName"].as_str())
        .unwrap_or("???")
}

fn text_or<'a>(value: &'a Value, default: &'a str) -> &'a str {
    value.as_str().filter(|s| !s.is_empty()).unwrap_or(default)
}
