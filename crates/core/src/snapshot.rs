use serde::Serialize;

use crate::game_state::Tetromino;
use crate::pieces::{get_shape, PieceShape};
use crate::types::{Grid, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    pub fn minos(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Per-step info; `score` is the cumulative shaped reward of the episode
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Info {
    pub score: f64,
    pub lines: u32,
    pub pieces: u32,
    pub episode: u32,
}

/// Everything a presentation layer needs, copied out of the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Settled cells only
    pub board: Grid,
    pub active: Option<ActiveSnapshot>,
    pub next: Option<PieceKind>,
    pub terminated: bool,
    pub last_reward: f64,
    pub info: Info,
}

impl GameSnapshot {
    /// Settled cells with the active piece overlaid (omitted once terminated)
    pub fn observation(&self) -> Grid {
        let mut grid = self.board;
        if !self.terminated {
            if let Some(active) = self.active {
                overlay_active(&mut grid, &active);
            }
        }
        grid
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: None,
            terminated: false,
            last_reward: 0.0,
            info: Info::default(),
        }
    }
}

/// Paint the active piece's in-bounds cells into `grid`
pub fn overlay_active(grid: &mut Grid, active: &ActiveSnapshot) {
    let color = active.kind.color_id();
    for (dx, dy) in active.minos() {
        let x = active.x + dx;
        let y = active.y + dy;
        if x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8 {
            grid[y as usize][x as usize] = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_overlays_active_piece() {
        let snap = GameSnapshot {
            active: Some(ActiveSnapshot {
                kind: PieceKind::O,
                rotation: 0,
                x: 3,
                y: 0,
            }),
            ..GameSnapshot::default()
        };
        let obs = snap.observation();
        assert_eq!(obs[0][3], 2);
        assert_eq!(obs[0][4], 2);
        assert_eq!(obs[1][3], 2);
        assert_eq!(obs[1][4], 2);
        // Settled board untouched
        assert_eq!(snap.board[0][3], 0);
    }

    #[test]
    fn observation_skips_cells_in_spawn_buffer() {
        let snap = GameSnapshot {
            active: Some(ActiveSnapshot {
                kind: PieceKind::I,
                rotation: 1,
                x: 0,
                y: -2,
            }),
            ..GameSnapshot::default()
        };
        let obs = snap.observation();
        let filled: usize = obs.iter().flatten().filter(|&&v| v != 0).count();
        assert_eq!(filled, 2);
    }
}
