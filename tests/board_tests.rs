//! Board tests - settled grid, collisions and line clears

use tetris_env::core::Board;
use tetris_env::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, y, Some(kind));
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_free(x, y), "Cell ({}, {}) should be free", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_out_of_bounds_is_rejected() {
    let mut board = Board::new();
    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::T)));
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_walls_floor_and_spawn_buffer() {
    let board = Board::new();
    // Side walls and the floor block
    assert!(!board.is_free(-1, 5));
    assert!(!board.is_free(BOARD_WIDTH as i8, 5));
    assert!(!board.is_free(3, BOARD_HEIGHT as i8));
    // Rows above the board never collide
    assert!(board.is_free(3, -1));
    assert!(board.is_free(0, -4));
    // ...but the walls still apply there
    assert!(!board.is_free(-1, -1));
}

#[test]
fn test_fits_checks_every_mino() {
    let mut board = Board::new();
    let o = [(0, 0), (1, 0), (0, 1), (1, 1)];
    assert!(board.fits(&o, 0, 0));
    assert!(board.fits(&o, 8, 18));
    assert!(!board.fits(&o, 9, 0));
    assert!(!board.fits(&o, 0, 19));

    board.set(1, 1, Some(PieceKind::Z));
    assert!(!board.fits(&o, 0, 0));
    assert!(board.fits(&o, 2, 0));
}

#[test]
fn test_lock_piece_collision_leaves_board_untouched() {
    let mut board = Board::new();
    board.set(4, 19, Some(PieceKind::L));
    let before = board.clone();
    let t = [(1, 0), (0, 1), (1, 1), (2, 1)];
    assert!(!board.lock_piece(&t, 3, 18, PieceKind::T));
    assert_eq!(board, before);

    assert!(board.lock_piece(&t, 3, 17, PieceKind::T));
    assert_eq!(board.occupied_count(), 5);
    assert_eq!(board.get(4, 17), Some(Some(PieceKind::T)));
}

#[test]
fn test_board_clear_full_rows_shifts_contents_down() {
    let mut board = Board::new();
    fill_row(&mut board, 19, PieceKind::I);
    fill_row(&mut board, 17, PieceKind::O);
    board.set(2, 18, Some(PieceKind::S));
    board.set(7, 16, Some(PieceKind::J));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[17, 19]);

    assert_eq!(board.occupied_count(), 2);
    assert_eq!(board.get(2, 19), Some(Some(PieceKind::S)));
    assert_eq!(board.get(7, 18), Some(Some(PieceKind::J)));
    assert!(!board.is_row_full(19));
}

#[test]
fn test_board_clear_all_rows() {
    let mut board = Board::new();
    for y in 0..BOARD_HEIGHT as i8 {
        fill_row(&mut board, y, PieceKind::Z);
    }
    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), BOARD_HEIGHT as usize);
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_grid_round_trip_uses_color_ids() {
    let mut board = Board::new();
    board.set(0, 19, Some(PieceKind::I));
    board.set(9, 0, Some(PieceKind::L));
    let grid = board.to_grid();
    assert_eq!(grid[19][0], 1);
    assert_eq!(grid[0][9], 7);
    assert_eq!(Board::from_grid(&grid), Some(board));

    let mut bad = grid;
    bad[5][5] = 8;
    assert_eq!(Board::from_grid(&bad), None);
}
