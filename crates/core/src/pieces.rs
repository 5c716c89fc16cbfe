//! Pieces module - tetromino catalog and rotation states
//!
//! Every piece is stored as a square occupancy matrix (I: 4x4, O: 2x2, others: 3x3).
//! The four rotation states are derived from the base shape by repeatedly applying a
//! clockwise quarter turn (transpose with row order reversed). The whole table is
//! built in a `const` context, so it is plain static data with no runtime init.
//!
//! There are no wall kicks: a rotation either fits at the current anchor or it fails.

use crate::types::PieceKind;

/// Largest matrix side in the catalog (the I piece)
pub const MAX_SIZE: usize = 4;

/// Offset of a single mino relative to the matrix's top-left corner, as (dx, dy)
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the anchor
pub type PieceShape = [MinoOffset; 4];

/// Square occupancy matrix of side `size`, padded into a 4x4 array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    rows: [[bool; MAX_SIZE]; MAX_SIZE],
}

impl Shape {
    const fn from_rows(size: u8, rows: [[u8; MAX_SIZE]; MAX_SIZE]) -> Self {
        let mut out = [[false; MAX_SIZE]; MAX_SIZE];
        let mut r = 0;
        while r < MAX_SIZE {
            let mut c = 0;
            while c < MAX_SIZE {
                out[r][c] = rows[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self { size, rows: out }
    }

    /// Side length of the matrix
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether matrix cell (row, col) is filled; false outside the matrix
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size as usize && col < self.size as usize && self.rows[row][col]
    }

    /// Clockwise quarter turn: `out[c][n-1-r] = in[r][c]`
    pub const fn rotate_cw(&self) -> Shape {
        let n = self.size as usize;
        let mut out = [[false; MAX_SIZE]; MAX_SIZE];
        let mut r = 0;
        while r < n {
            let mut c = 0;
            while c < n {
                out[r][c] = self.rows[n - 1 - c][r];
                c += 1;
            }
            r += 1;
        }
        Shape {
            size: self.size,
            rows: out,
        }
    }

    /// Filled cells as (dx, dy) offsets, scanned row by row
    pub fn minos(&self) -> PieceShape {
        let mut out = [(0, 0); 4];
        let mut i = 0;
        for r in 0..self.size as usize {
            for c in 0..self.size as usize {
                if self.rows[r][c] && i < out.len() {
                    out[i] = (c as i8, r as i8);
                    i += 1;
                }
            }
        }
        out
    }

    /// Number of filled cells (always 4 for catalog shapes)
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&v| v)
            .count()
    }
}

const BASE_SHAPES: [Shape; 7] = [
    // I
    Shape::from_rows(4, [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // O
    Shape::from_rows(2, [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // T
    Shape::from_rows(3, [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // S
    Shape::from_rows(3, [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // Z
    Shape::from_rows(3, [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // J
    Shape::from_rows(3, [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // L
    Shape::from_rows(3, [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
];

const fn build_rotations() -> [[Shape; 4]; 7] {
    let mut table = [[BASE_SHAPES[0]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let mut cur = BASE_SHAPES[k];
        let mut i = 0;
        while i < 4 {
            table[k][i] = cur;
            cur = cur.rotate_cw();
            i += 1;
        }
        k += 1;
    }
    table
}

static ROTATIONS: [[Shape; 4]; 7] = build_rotations();

/// Matrix side for a piece kind: I=4, O=2, others=3
pub fn size(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::I => 4,
        PieceKind::O => 2,
        _ => 3,
    }
}

/// Occupancy matrix for rotation `index mod 4`
pub fn rotation(kind: PieceKind, index: usize) -> &'static Shape {
    &ROTATIONS[kind.index()][index % 4]
}

/// Mino offsets for a kind and rotation index
pub fn get_shape(kind: PieceKind, rotation_index: u8) -> PieceShape {
    rotation(kind, rotation_index as usize).minos()
}

/// Rotation center (row, col) inside the matrix
///
/// A clockwise turn maps matrix cell (r, c) to (c, n-1-r), which is a quarter turn
/// about this point.
pub fn rotation_center(kind: PieceKind) -> (f32, f32) {
    match kind {
        PieceKind::I => (1.5, 1.5),
        PieceKind::O => (0.5, 0.5),
        _ => (1.0, 1.0),
    }
}
