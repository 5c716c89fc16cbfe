//! Session configuration read from environment variables.

use std::env;
use std::fmt;

/// How new pieces are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceRule {
    /// Each spawn picks one of the 7 kinds uniformly
    #[default]
    Uniform,
    /// Shuffled bags containing each kind once
    Bag7,
}

impl PieceRule {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Some(PieceRule::Uniform),
            "bag7" | "bag" | "7bag" => Some(PieceRule::Bag7),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceRule::Uniform => "uniform",
            PieceRule::Bag7 => "bag7",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidSeed(String),
    InvalidPieceRule(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed(v) => write!(f, "invalid seed: {}", v),
            ConfigError::InvalidPieceRule(v) => {
                write!(f, "invalid piece rule: {} (expected uniform|bag7)", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvConfig {
    pub seed: u32,
    pub piece_rule: PieceRule,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            piece_rule: PieceRule::Uniform,
        }
    }
}

impl EnvConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_ENV_SEED`: initial seed (default 1)
    /// - `TETRIS_ENV_PIECE_RULE`: `uniform` or `bag7` (default uniform)
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let seed = env::var("TETRIS_ENV_SEED")
            .ok()
            .and_then(|s| parse_seed(&s).ok())
            .unwrap_or(defaults.seed);

        let piece_rule = env::var("TETRIS_ENV_PIECE_RULE")
            .ok()
            .and_then(|s| parse_piece_rule(&s).ok())
            .unwrap_or(defaults.piece_rule);

        Self { seed, piece_rule }
    }
}

pub fn parse_seed(s: &str) -> Result<u32, ConfigError> {
    s.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidSeed(s.to_string()))
}

pub fn parse_piece_rule(s: &str) -> Result<PieceRule, ConfigError> {
    PieceRule::from_str(s).ok_or_else(|| ConfigError::InvalidPieceRule(s.to_string()))
}
