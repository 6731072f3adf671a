//! Core services for gridiron-agent.
//!
//! Everything here is independent of how the conversation is presented; the
//! REPL in `interfaces` talks to the orchestrator over channels.

pub mod agents;
pub mod fallback;
pub mod llm;
pub mod mocks;
pub mod orchestrator;
pub mod stats;
pub mod tools;
