use assert_cmd::Command;
use clap::Parser;
use gridiron_agent::cli::{Args, Mode};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_default_args() {
    let args = Args::try_parse_from(["gridiron-agent"]).unwrap();
    assert_eq!(args.mode, None);
    assert_eq!(args.model, None);
    assert!(args.config.is_none());
    assert!(!args.no_stream);
}

#[test]
fn test_parse_all_flags() {
    let args = Args::try_parse_from([
        "gridiron-agent",
        "--mode",
        "resilient",
        "--model",
        "gemini-2.5-flash",
        "--config",
        "agent.toml",
        "--no-stream",
    ])
    .unwrap();

    assert_eq!(args.mode, Some(Mode::Resilient));
    assert_eq!(args.model.as_deref(), Some("gemini-2.5-flash"));
    assert_eq!(args.config.unwrap().to_str(), Some("agent.toml"));
    assert!(args.no_stream);
}

#[test]
fn test_invalid_mode_rejected() {
    assert!(Args::try_parse_from(["gridiron-agent", "--mode", "psychic"]).is_err());
}

#[test]
fn test_mode_capabilities() {
    assert!(!Mode::Plain.always_enriches());
    assert!(!Mode::Plain.routes_intent());
    assert!(!Mode::Plain.uses_fallback());
    assert!(!Mode::Plain.uses_tools());

    assert!(Mode::Enriched.always_enriches());
    assert!(!Mode::Enriched.routes_intent());

    assert!(Mode::Routed.routes_intent());
    assert!(!Mode::Routed.uses_fallback());

    assert!(Mode::Resilient.routes_intent());
    assert!(Mode::Resilient.uses_fallback());
    assert!(!Mode::Resilient.uses_tools());

    assert!(Mode::Tools.uses_tools());
    assert!(Mode::Tools.uses_fallback());
    assert!(!Mode::Tools.routes_intent());
}

#[test]
fn test_mode_default_and_parse_name() {
    assert_eq!(Mode::default(), Mode::Tools);
    assert_eq!(Mode::parse_name("ROUTED"), Some(Mode::Routed));
    assert_eq!(Mode::parse_name(" plain "), Some(Mode::Plain));
    assert_eq!(Mode::parse_name("nope"), None);
}

#[test]
fn test_binary_requires_api_key() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("gridiron-agent")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("API_KEY")
        .env_remove("GEMINI_API_KEY")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_binary_help() {
    Command::cargo_bin("gridiron-agent")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"));
}
