//! gridiron-agent library crate.
//!
//! A command-line NFL chat assistant: a hosted LLM session, optionally
//! enriched with live statistics chosen by keyword routing or by the model
//! itself through function calling.

pub mod cli;
pub mod config;
pub mod core;
pub mod interfaces;
pub mod types;

// Re-export main items for easier access
pub use config::AppConfig;
