use tetris_env::core::{GameState, SequencePieces};
use tetris_env::term::{palette, GameView, Viewport};
use tetris_env::types::{Action, PieceKind};

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // board pixels = 10*2 by 20*1 => 20x20
    // plus border => 22x22
    let fb = view.render(&snap, Viewport::new(22, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_settled_cell_as_two_chars_wide() {
    let mut env = GameState::with_source(SequencePieces::new(vec![PieceKind::I, PieceKind::T]).unwrap());
    for _ in 0..3 {
        env.step(Action::MoveLeft);
    }
    env.step(Action::HardDrop);

    let fb = GameView::default().render(&env.snapshot(), Viewport::new(22, 22));
    // Settled I on row 19, columns 0..=3; board origin is (1, 1)
    for px in 1..9 {
        let cell = fb.get(px, 20).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, palette(PieceKind::I.color_id()));
    }
    assert_eq!(fb.get(9, 20).unwrap().ch, '·');
}

#[test]
fn term_view_reflects_game_over() {
    let mut env = GameState::new(3);
    env.reset(Some(3));
    while !env.terminated() {
        env.step(Action::HardDrop);
    }

    let fb = GameView::default().render(&env.snapshot(), Viewport::new(60, 24));
    let has = |needle: &str| (0..fb.height()).any(|y| fb.row_text(y).contains(needle));
    assert!(has("GAME OVER"));
    assert!(has("SCORE"));
}
