//! Adapter module - trainer control via TCP socket with JSON protocol
//!
//! Exposes the environment's `reset`/`step` surface to an external training
//! process (for example a Python RL loop) without linking against it.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP. Every
//! connection gets its own independent session; sessions share no state.
//!
//! ## Client → Server
//!
//! - **reset**: `{"type":"reset","seq":1,"seed":42}` (`seed` optional)
//! - **step**: `{"type":"step","seq":2,"action":3}` (id `0..=3` or a name such as
//!   `"move_left"`, `"rotate"`, `"hard_drop"`)
//! - **snapshot**: `{"type":"snapshot","seq":3}`
//!
//! ## Server → Client
//!
//! - **reset**: empty settled board plus `info`
//! - **observation**: board with the active piece overlaid, `reward`,
//!   `terminated`, `truncated` (always false), `info`, optional `last_event`
//! - **snapshot**: settled board, observation, active piece, next piece, `info`
//! - **error**: `code` (`invalid_message`, `invalid_action`, `not_reset`,
//!   `line_too_long`) and `message`; the connection stays open except for
//!   `line_too_long`
//!
//! # Environment Variables
//!
//! - `TETRIS_ENV_HOST`: Bind address (default: "127.0.0.1")
//! - `TETRIS_ENV_PORT`: Port number (default: 7878)
//! - `TETRIS_ENV_LOG_PATH`: Append every inbound/outbound line as JSONL
//! - `TETRIS_ENV_MAX_LINE_BYTES`: Longest accepted request line (default: 65536)
//! - `TETRIS_ENV_SEED`, `TETRIS_ENV_PIECE_RULE`: session defaults
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"reset","seq":1,"seed":7}
//! {"type":"step","seq":2,"action":"hard_drop"}
//! ```

pub mod protocol;
pub mod server;
pub mod session;

pub use tetris_env_core as core;
pub use tetris_env_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::{run_server, ServerConfig};
pub use session::ClientSession;
