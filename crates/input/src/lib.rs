//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Action`] ids for human play.
//! The environment is turn-based, so there is no auto-repeat handling: one key
//! press is one step.

pub mod map;

pub use tetris_env_types as types;

pub use map::{handle_key_event, should_quit, should_restart};
