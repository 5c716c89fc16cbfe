//! Core environment logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, the session state and the reward shaping.
//! It has no dependencies on UI, networking, or I/O, so the same session can be
//! driven by a human at a terminal, by a training loop in-process, or by the
//! line-delimited JSON adapter.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 settled grid with collision checks and line clearing
//! - [`pieces`]: tetromino matrices and their precomputed rotation states
//! - [`rng`]: seedable piece sources (uniform, 7-bag, fixed sequence)
//! - [`scoring`]: holes, aggregate height, bumpiness and the shaped reward
//! - [`game_state`]: the session: `reset`, `step`, movement, gravity and settling
//! - [`snapshot`]: copied-out views for renderers and observers
//! - [`config`]: session settings read from the environment
//!
//! # Rules
//!
//! - One action per step: left, right, rotate (clockwise), or hard drop
//! - Every non-drop action is followed by one row of gravity
//! - No wall kicks, no hold, no lock delay
//! - A piece that cannot fall settles immediately; full rows are cleared and the next
//!   piece spawns at (3, 0)
//! - The episode ends when that spawn position is blocked
//!
//! # Example
//!
//! ```
//! use tetris_env_core::GameState;
//! use tetris_env_types::Action;
//!
//! let mut env = GameState::new(12345);
//! let (board, info) = env.reset(Some(7));
//! assert!(board.iter().flatten().all(|&v| v == 0));
//! assert_eq!(info.score, 0.0);
//!
//! env.step(Action::MoveRight);
//! env.step(Action::Rotate);
//! let result = env.step(Action::HardDrop);
//!
//! // Settling on an empty board never clears a line, so the reward is a penalty
//! assert!(result.reward < 0.0);
//! assert_eq!(result.info.score, result.reward);
//! ```

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_env_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, EnvConfig, PieceRule};
pub use game_state::{GameState, SettleEvent, StepResult, Tetromino};
pub use pieces::{get_shape, PieceShape, Shape};
pub use rng::{PieceQueue, PieceSource, Randomizer, SequencePieces, SimpleRng, UniformPieces};
pub use scoring::{shaped_reward, BoardMetrics};
pub use snapshot::{ActiveSnapshot, GameSnapshot, Info};
