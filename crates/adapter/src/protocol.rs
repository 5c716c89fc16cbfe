//! Protocol module - JSON message types for the trainer adapter
//!
//! Line-delimited JSON over TCP. Every message carries `type` and `seq`; server
//! messages also carry `ts` (milliseconds since the Unix epoch). Responses echo the
//! `seq` of the request they answer.

use serde::{Deserialize, Serialize};

use crate::core::{ActiveSnapshot, GameSnapshot, Info, SettleEvent, StepResult};
use crate::types::{Action, ActionError, Grid, PieceKind};

// ============== Client -> Server Messages ==============

/// Request sent by a trainer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Start a new episode; `seed` restarts the piece sequence
    Reset {
        #[serde(default)]
        seq: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u32>,
    },
    /// Apply one action
    Step {
        #[serde(default)]
        seq: u64,
        action: ActionValue,
    },
    /// Read the session state without advancing it
    Snapshot {
        #[serde(default)]
        seq: u64,
    },
}

/// Action given either by id (`3`) or by name (`"hard_drop"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    Id(i64),
    Name(String),
}

impl ActionValue {
    pub fn resolve(&self) -> Result<Action, ActionError> {
        match self {
            ActionValue::Id(id) => Action::try_from(*id),
            ActionValue::Name(name) => {
                Action::from_str(name).ok_or_else(|| ActionError::UnknownName(name.clone()))
            }
        }
    }
}

impl From<Action> for ActionValue {
    fn from(action: Action) -> Self {
        ActionValue::Id(action.id() as i64)
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResetType {
    #[serde(rename = "reset")]
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SnapshotType {
    #[serde(rename = "snapshot")]
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// Line is not valid JSON or not a known request
    #[serde(rename = "invalid_message")]
    InvalidMessage,
    /// Action id out of range or unknown action name
    #[serde(rename = "invalid_action")]
    InvalidAction,
    /// `step` or `snapshot` before the first `reset` on this connection
    #[serde(rename = "not_reset")]
    NotReset,
    /// Line exceeded the configured maximum length; the connection is closed
    #[serde(rename = "line_too_long")]
    LineTooLong,
}


/// Response to `reset`: the empty settled board
#[derive(Debug, Clone, Serialize)]
pub struct ResetMessage {
    #[serde(rename = "type")]
    pub msg_type: ResetType,
    pub seq: u64,
    pub ts: u64,
    pub board: Grid,
    pub info: Info,
}

/// Response to `step`
#[derive(Debug, Clone, Serialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    /// Board with the active piece overlaid
    pub board: Grid,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<SettleEvent>,
}

/// Response to `snapshot`
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: SnapshotType,
    pub seq: u64,
    pub ts: u64,
    /// Settled cells only
    pub board: Grid,
    /// Settled cells with the active piece overlaid
    pub observation: Grid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PieceKind>,
    pub terminated: bool,
    pub last_reward: f64,
    pub info: Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Any message the server writes
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Reset(ResetMessage),
    Observation(ObservationMessage),
    Snapshot(SnapshotMessage),
    Error(ErrorMessage),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

// ============== Parsing ==============

/// Parse one inbound line
///
/// Malformed JSON, a missing or unknown `type`, and bad field types all map to an
/// `invalid_message` error that echoes the `seq` when one can be recovered.
pub fn parse_request(line: &str) -> Result<Request, ErrorMessage> {
    serde_json::from_str::<Request>(line).map_err(|e| {
        let seq = serde_json::from_str::<serde_json::Value>(line)
            .ok()
            .and_then(|v| v.get("seq").and_then(|s| s.as_u64()))
            .unwrap_or(0);
        create_error(seq, ErrorCode::InvalidMessage, &e.to_string())
    })
}

// ============== Utility Functions ==============

pub fn create_reset(seq: u64, board: Grid, info: Info) -> ResetMessage {
    ResetMessage {
        msg_type: ResetType::Reset,
        seq,
        ts: current_timestamp_ms(),
        board,
        info,
    }
}

pub fn create_observation(
    seq: u64,
    result: &StepResult,
    last_event: Option<SettleEvent>,
) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        board: result.observation,
        reward: result.reward,
        terminated: result.terminated,
        truncated: result.truncated,
        info: result.info,
        last_event,
    }
}

pub fn create_snapshot(seq: u64, snap: &GameSnapshot) -> SnapshotMessage {
    SnapshotMessage {
        msg_type: SnapshotType::Snapshot,
        seq,
        ts: current_timestamp_ms(),
        board: snap.board,
        observation: snap.observation(),
        active: snap.active,
        next: snap.next,
        terminated: snap.terminated,
        last_reward: snap.last_reward,
        info: snap.info,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
