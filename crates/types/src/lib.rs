//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the environment.
//! All types are plain data with no engine logic, making them usable in any
//! context (core logic, terminal rendering, the trainer-facing adapter).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the topmost visible row)
//! - **Spawn position**: (3, 0), the top-left corner of the piece matrix
//!
//! # Reward Weights
//!
//! | Constant | Value | Applied to |
//! |----------|-------|------------|
//! | `LINE_CLEAR_REWARD` | 10.0 | each cleared line |
//! | `GAME_OVER_PENALTY` | 20.0 | once, when the next spawn is blocked |
//! | `HOLE_WEIGHT` | 0.5 | holes after the settle |
//! | `HEIGHT_WEIGHT` | 0.1 | aggregate column height |
//! | `BUMPINESS_WEIGHT` | 0.2 | adjacent column height differences |
//!
//! # Examples
//!
//! ```
//! use tetris_env_types::{Action, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(piece.color_id(), 3);
//! assert_eq!(PieceKind::from_color_id(3), Some(PieceKind::T));
//!
//! let action = Action::try_from(3u8).unwrap();
//! assert_eq!(action, Action::HardDrop);
//! assert!(Action::try_from(4u8).is_err());
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn anchor (x, y) for the top-left corner of a new piece's matrix
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Reward per cleared line
pub const LINE_CLEAR_REWARD: f64 = 10.0;

/// Penalty applied on the settle that ends the game
pub const GAME_OVER_PENALTY: f64 = 20.0;

/// Penalty per hole
pub const HOLE_WEIGHT: f64 = 0.5;

/// Penalty per unit of aggregate height
pub const HEIGHT_WEIGHT: f64 = 0.1;

/// Penalty per unit of bumpiness
pub const BUMPINESS_WEIGHT: f64 = 0.2;

/// Render loop pacing for presentation layers (frames per second)
pub const RENDER_FPS: u32 = 10;

/// Snapshot grid: row-major, 0 = empty, 1..=7 = color id
pub type Grid = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// The seven tetromino piece kinds, in catalog order
///
/// Catalog order defines the color id: I=1, O=2, T=3, S=4, Z=5, J=6, L=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Zero-based catalog index
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Color id written into the board (1-based catalog index)
    pub fn color_id(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Inverse of [`PieceKind::color_id`]; `None` for 0 and anything above 7
    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use tetris_env_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter, as the piece is usually named
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell settled by the specified piece kind
pub type Cell = Option<PieceKind>;

/// Discrete actions accepted by `step`
///
/// The discriminants are the wire/agent action ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    /// Move piece one cell left
    MoveLeft = 0,
    /// Move piece one cell right
    MoveRight = 1,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate = 2,
    /// Drop piece to the lowest valid row and settle it
    HardDrop = 3,
}

impl Action {
    /// All actions ordered by id
    pub const ALL: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Rotate,
        Action::HardDrop,
    ];

    /// Number of actions (size of the discrete action space)
    pub const COUNT: usize = 4;

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Parse action from its name (case-insensitive, `_`/`-` ignored)
    ///
    /// ```
    /// use tetris_env_types::Action;
    ///
    /// assert_eq!(Action::from_str("move_left"), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_str("hardDrop"), Some(Action::HardDrop));
    /// assert_eq!(Action::from_str("drop"), Some(Action::HardDrop));
    /// assert_eq!(Action::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let norm: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "moveleft" | "left" => Some(Action::MoveLeft),
            "moveright" | "right" => Some(Action::MoveRight),
            "rotate" => Some(Action::Rotate),
            "harddrop" | "drop" => Some(Action::HardDrop),
            _ => None,
        }
    }

    /// snake_case name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Rotate => "rotate",
            Action::HardDrop => "hard_drop",
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::MoveLeft),
            1 => Ok(Action::MoveRight),
            2 => Ok(Action::Rotate),
            3 => Ok(Action::HardDrop),
            other => Err(ActionError::OutOfRange(other as i64)),
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = ActionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ActionError::OutOfRange(value))
            .and_then(Action::try_from)
    }
}

/// Rejected construction of an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Numeric id outside `0..Action::COUNT`
    OutOfRange(i64),
    /// Name that does not match any action
    UnknownName(String),
}

impl ActionError {
    pub fn code(&self) -> &'static str {
        "invalid_action"
    }

    pub fn message(&self) -> String {
        match self {
            ActionError::OutOfRange(v) => {
                format!("action id {} is outside 0..{}", v, Action::COUNT)
            }
            ActionError::UnknownName(s) => format!("unknown action name: {}", s),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ActionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_ids_follow_catalog_order() {
        let ids: Vec<u8> = PieceKind::ALL.iter().map(|k| k.color_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_color_id(kind.color_id()), Some(kind));
        }
        assert_eq!(PieceKind::from_color_id(0), None);
        assert_eq!(PieceKind::from_color_id(8), None);
    }

    #[test]
    fn action_ids_are_stable() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.id() as usize, i);
            assert_eq!(Action::try_from(i as u8), Ok(*action));
        }
    }

    #[test]
    fn invalid_action_ids_fail_fast() {
        assert_eq!(Action::try_from(4u8), Err(ActionError::OutOfRange(4)));
        assert_eq!(Action::try_from(-1i64), Err(ActionError::OutOfRange(-1)));
        assert_eq!(Action::try_from(300i64), Err(ActionError::OutOfRange(300)));
        assert_eq!(ActionError::OutOfRange(9).code(), "invalid_action");
    }

    #[test]
    fn action_names_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_str(action.as_str()), Some(action));
        }
    }
}
