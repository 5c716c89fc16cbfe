//! Falling-block puzzle environment (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tetris_env::{core,adapter,term,input,types}` and hosts the
//! headless [`rollout`] driver used by the `rollout` binary.

pub mod rollout;

pub use tetris_env_adapter as adapter;
pub use tetris_env_core as core;
pub use tetris_env_input as input;
pub use tetris_env_term as term;
pub use tetris_env_types as types;
