//! Terminal presentation for human play.
//!
//! Renders a [`core::GameSnapshot`] into a simple framebuffer that is flushed to the
//! terminal with crossterm. Nothing here mutates the session; the interactive loop
//! owns the `GameState` and hands snapshots over.
//!
//! - [`fb`]: styled character framebuffer and the piece palette
//! - [`game_view`]: board, side panel and game-over overlay
//! - [`renderer`]: full and diff terminal output
//! - [`frame_limiter`]: draw pacing (10 FPS by default)

pub mod fb;
pub mod frame_limiter;
pub mod game_view;
pub mod renderer;

pub use tetris_env_core as core;
pub use tetris_env_types as types;

pub use fb::{palette, Cell, CellStyle, FrameBuffer, Rgb};
pub use frame_limiter::FrameLimiter;
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
