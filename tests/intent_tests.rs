use gridiron_agent::core::stats::intent::{DataNeed, LeaderCategory, classify};

fn team_of(need: DataNeed) -> &'static str {
    match need {
        DataNeed::TeamStats(team) => team.abbreviation,
        other => panic!("expected team stats, got {:?}", other),
    }
}

#[test]
fn test_scoreboard_questions() {
    for question in [
        "What are the scores right now?",
        "Who won last night?",
        "show me the scoreboard",
        "Any good games tonight?",
        "Who won the Chiefs game?",
    ] {
        assert_eq!(classify(question), DataNeed::Scoreboard, "{}", question);
    }
}

#[test]
fn test_leader_questions() {
    assert_eq!(
        classify("Who is the best quarterback this year?"),
        DataNeed::Leaders(LeaderCategory::Passing)
    );
    assert_eq!(
        classify("Who has the most passing yards?"),
        DataNeed::Leaders(LeaderCategory::Passing)
    );
    assert_eq!(
        classify("Who leads the league in rushing?"),
        DataNeed::Leaders(LeaderCategory::Rushing)
    );
    assert_eq!(
        classify("top wide receivers"),
        DataNeed::Leaders(LeaderCategory::Receiving)
    );
}

#[test]
fn test_position_without_leader_hint_is_not_leaders() {
    assert!(!matches!(
        classify("Explain what a quarterback does"),
        DataNeed::Leaders(_)
    ));
}

#[test]
fn test_team_questions() {
    assert_eq!(team_of(classify("How are the Eagles doing?")), "PHI");
    assert_eq!(team_of(classify("tell me about the Green Bay Packers")), "GB");
    assert_eq!(team_of(classify("Is Buffalo any good?")), "BUF");
}

#[test]
fn test_player_search_questions() {
    assert_eq!(
        classify("Who is Patrick Mahomes?"),
        DataNeed::PlayerSearch("Patrick Mahomes".to_string())
    );
    assert_eq!(
        classify("stats for Justin Jefferson"),
        DataNeed::PlayerSearch("Justin Jefferson".to_string())
    );
    assert_eq!(
        classify("How is Saquon Barkley playing lately?"),
        DataNeed::PlayerSearch("Saquon Barkley".to_string())
    );
}

#[test]
fn test_general_questions_need_nothing() {
    assert_eq!(classify("What is a two-point conversion?"), DataNeed::None);
    assert_eq!(classify("Explain the offside rule"), DataNeed::None);
    assert_eq!(classify(""), DataNeed::None);
    assert_eq!(classify("   "), DataNeed::None);
    assert_eq!(classify("How's it going?"), DataNeed::None);
    assert_eq!(classify("How is your day?"), DataNeed::None);
    assert_eq!(classify("Who is the greatest of all time?"), DataNeed::None);
    assert_eq!(classify("NO way the refs got that right"), DataNeed::None);
}

#[test]
fn test_category_metadata() {
    assert_eq!(LeaderCategory::Passing.api_name(), "passingYards");
    assert_eq!(LeaderCategory::from_name("RUSHING"), Some(LeaderCategory::Rushing));
    assert_eq!(LeaderCategory::from_name("receivingYards"), Some(LeaderCategory::Receiving));
    assert_eq!(LeaderCategory::from_name("kicking"), None);
    assert_eq!(LeaderCategory::Receiving.to_string(), "receiving");
}
