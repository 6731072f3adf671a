//! Canned answers for when the model is rate limited.

use once_cell::sync::Lazy;
use regex::Regex;

struct Entry {
    pattern: Regex,
    answer: &'static str,
}

pub const DEFAULT_ANSWER: &str = "I'm getting too many requests right now, so I can't give a full answer. \
Give me a minute and ask again. In the meantime, try asking about scores, stat leaders, or a specific team.";

static ENTRIES: Lazy<Vec<Entry>> = Lazy::new(|| {
    [
        (
            r"\b(scores?|scoreboard|who won|winning|games? (today|tonight))\b",
            "I can't reach my full brain right now. For live scores, check the NFL scoreboard on \
             ESPN or NFL.com; games usually kick off Thursday night, Sunday and Monday night.",
        ),
        (
            r"\b(passing|passers?|quarterbacks?|qbs?)\b",
            "I'm rate limited at the moment. Quarterbacks are usually ranked by passing yards, \
             touchdown passes and passer rating; the league leaders page on NFL.com has current numbers.",
        ),
        (
            r"\b(rushing|rushers?|running ?backs?)\b",
            "I'm rate limited at the moment. Rushing leaders are ranked by total rushing yards; \
             1,000 yards in a season is the classic benchmark for a strong running back.",
        ),
        (
            r"\b(receiving|receivers?|receptions|catches|tight ends?)\b",
            "I'm rate limited at the moment. Receivers are usually compared by receiving yards, \
             receptions and touchdown catches; 1,000 receiving yards marks a standout season.",
        ),
        (
            r"\bsuper ?bowl\b",
            "I'm rate limited right now. The Super Bowl is the NFL championship game, played in \
             February between the AFC and NFC champions.",
        ),
        (
            r"\bdraft\b",
            "I'm rate limited right now. The NFL Draft happens every spring over seven rounds, \
             with teams picking in reverse order of the previous season's standings.",
        ),
        (
            r"\b(playoffs?|postseason|wild ?card)\b",
            "I'm rate limited right now. Fourteen teams make the NFL playoffs, seven per conference, \
             and only the top seed in each conference gets a first-round bye.",
        ),
        (
            r"\b(rules?|penalt(y|ies)|touchdown|field goal|safety|overtime)\b",
            "I'm rate limited right now. Quick scoring refresher: touchdown 6, extra point 1, \
             two-point conversion 2, field goal 3, safety 2.",
        ),
    ]
    .into_iter()
    .map(|(pattern, answer)| Entry {
        pattern: Regex::new(&format!("(?i){}", pattern)).expect("fallback pattern"),
        answer,
    })
    .collect()
});

/// Pick the canned answer for `question`; the first matching topic wins.
pub fn answer(question: &str) -> &'static str {
    ENTRIES
        .iter()
        .find(|entry| entry.pattern.is_match(question))
        .map(|entry| entry.answer)
        .unwrap_or(DEFAULT_ANSWER)
}
