//! Static table of NFL franchises used for matching team mentions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    /// ESPN abbreviation, also accepted by the team endpoint
    pub abbreviation: &'static str,
    pub city: &'static str,
    pub nickname: &'static str,
}

const fn team(abbreviation: &'static str, city: &'static str, nickname: &'static str) -> Team {
    Team {
        abbreviation,
        city,
        nickname,
    }
}

pub static TEAMS: [Team; 32] = [
    team("ARI", "Arizona", "Cardinals"),
    team("ATL", "Atlanta", "Falcons"),
    team("BAL", "Baltimore", "Ravens"),
    team("BUF", "Buffalo", "Bills"),
    team("CAR", "Carolina", "Panthers"),
    team("CHI", "Chicago", "Bears"),
    team("CIN", "Cincinnati", "Bengals"),
    team("CLE", "Cleveland", "Browns"),
    team("DAL", "Dallas", "Cowboys"),
    team("DEN", "Denver", "Broncos"),
    team("DET", "Detroit", "Lions"),
    team("GB", "Green Bay", "Packers"),
    team("HOU", "Houston", "Texans"),
    team("IND", "Indianapolis", "Colts"),
    team("JAX", "Jacksonville", "Jaguars"),
    team("KC", "Kansas City", "Chiefs"),
    team("LV", "Las Vegas", "Raiders"),
    team("LAC", "Los Angeles", "Chargers"),
    team("LAR", "Los Angeles", "Rams"),
    team("MIA", "Miami", "Dolphins"),
    team("MIN", "Minnesota", "Vikings"),
    team("NE", "New England", "Patriots"),
    team("NO", "New Orleans", "Saints"),
    team("NYG", "New York", "Giants"),
    team("NYJ", "New York", "Jets"),
    team("PHI", "Philadelphia", "Eagles"),
    team("PIT", "Pittsburgh", "Steelers"),
    team("SF", "San Francisco", "49ers"),
    team("SEA", "Seattle", "Seahawks"),
    team("TB", "Tampa Bay", "Buccaneers"),
    team("TEN", "Tennessee", "Titans"),
    team("WSH", "Washington", "Commanders"),
];

/// Abbreviations that are also ordinary English words.
const WORD_ABBREVIATIONS: [&str; 5] = ["NO", "CAR", "TEN", "SEA", "PIT"];

const FOOTBALL_CONTEXT: [&str; 14] = [
    "team", "game", "record", "season", "play", "playing", "played", "beat", "win", "won",
    "lose", "lost", "nfl", "football",
];

/// Find the first franchise named in `text`, by nickname, unambiguous city or
/// uppercase abbreviation.
///
/// Matching is case-insensitive and respects word boundaries, so "bears" matches
/// but "bearsden" does not. Cities shared by two teams (New York, Los Angeles)
/// only match together with a nickname. Abbreviations that double as words
/// ("NO", "TEN") need a football word elsewhere in the text.
pub fn find_team(text: &str) -> Option<Team> {
    let lowered = text.to_lowercase();

    TEAMS
        .iter()
        .find(|team| contains_word(&lowered, &team.nickname.to_lowercase()))
        .or_else(|| {
            TEAMS.iter().find(|team| {
                let city = team.city.to_lowercase();
                let shared = TEAMS.iter().filter(|t| t.city == team.city).count() > 1;
                !shared && contains_word(&lowered, &city)
            })
        })
        .or_else(|| {
            let football = FOOTBALL_CONTEXT
                .iter()
                .any(|word| contains_word(&lowered, word));
            text.split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|word| football || !WORD_ABBREVIATIONS.contains(word))
                .find_map(|word| TEAMS.iter().find(|team| team.abbreviation == word))
        })
        .copied()
}

/// Resolve a user-supplied team reference (abbreviation, nickname, city or full name).
pub fn lookup(name: &str) -> Option<Team> {
    let trimmed = name.trim();
    TEAMS
        .iter()
        .find(|team| team.abbreviation.eq_ignore_ascii_case(trimmed))
        .copied()
        .or_else(|| find_team(trimmed))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
