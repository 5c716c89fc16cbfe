//! Scoring module - board-quality metrics and the shaped reward
//!
//! Metrics are computed on the settled board after line clears:
//! - holes: empty cells with an occupied cell somewhere above them in the same column
//! - aggregate height: sum of column heights (H - topmost occupied row, 0 if empty)
//! - bumpiness: sum of |h[i] - h[i+1]| over adjacent columns

use serde::Serialize;

use crate::board::Board;
use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, BUMPINESS_WEIGHT, GAME_OVER_PENALTY, HEIGHT_WEIGHT, HOLE_WEIGHT,
    LINE_CLEAR_REWARD,
};

/// Board-quality metrics for one settled board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoardMetrics {
    pub holes: u32,
    pub aggregate_height: u32,
    pub bumpiness: u32,
    pub max_height: u32,
}

impl BoardMetrics {
    pub fn of(board: &Board) -> Self {
        let heights = column_heights(board);
        Self {
            holes: count_holes(board),
            aggregate_height: heights.iter().sum(),
            bumpiness: bumpiness_of(&heights),
            max_height: heights.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Height of each column: H minus the row of its topmost occupied cell, 0 if empty
pub fn column_heights(board: &Board) -> [u32; BOARD_WIDTH as usize] {
    let mut heights = [0u32; BOARD_WIDTH as usize];
    for (x, h) in heights.iter_mut().enumerate() {
        for y in 0..BOARD_HEIGHT {
            if board.is_occupied(x as i8, y as i8) {
                *h = (BOARD_HEIGHT - y) as u32;
                break;
            }
        }
    }
    heights
}

/// Empty cells covered by at least one occupied cell in the same column
pub fn count_holes(board: &Board) -> u32 {
    let mut holes = 0;
    for x in 0..BOARD_WIDTH as i8 {
        let mut covered = false;
        for y in 0..BOARD_HEIGHT as i8 {
            if board.is_occupied(x, y) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

pub fn aggregate_height(board: &Board) -> u32 {
    column_heights(board).iter().sum()
}

pub fn bumpiness(board: &Board) -> u32 {
    bumpiness_of(&column_heights(board))
}

fn bumpiness_of(heights: &[u32]) -> u32 {
    heights
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]))
        .sum()
}

/// Shaped reward for one settle
///
/// `10*lines - 20*[game over] - 0.5*holes - 0.1*aggregate_height - 0.2*bumpiness`
pub fn shaped_reward(lines_cleared: usize, game_over: bool, metrics: &BoardMetrics) -> f64 {
    let mut reward = LINE_CLEAR_REWARD * lines_cleared as f64;
    if game_over {
        reward -= GAME_OVER_PENALTY;
    }
    reward -= HOLE_WEIGHT * metrics.holes as f64;
    reward -= HEIGHT_WEIGHT * metrics.aggregate_height as f64;
    reward -= BUMPINESS_WEIGHT * metrics.bumpiness as f64;
    reward
}
