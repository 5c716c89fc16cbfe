//! Game state module - one environment session
//!
//! This module ties together the board, the piece catalog, the piece source and the
//! reward evaluator. It exposes the turn-based `reset`/`step` surface: every step
//! applies one action, advances gravity by one row unless the action was a hard drop,
//! settles the piece when it can no longer fall, clears lines, spawns the next piece
//! and scores the resulting board.
//!
//! Illegal moves are silent no-ops. The session terminates exactly when a freshly
//! spawned piece does not fit at the spawn position; after that `step` only returns
//! the frozen observation.

use serde::Serialize;

use crate::config::EnvConfig;
use crate::pieces::{self, PieceShape, Shape};
use crate::rng::{PieceSource, Randomizer};
use crate::scoring::{shaped_reward, BoardMetrics};
use crate::snapshot::{overlay_active, ActiveSnapshot, GameSnapshot, Info};
use crate::types::{Action, Grid, PieceKind, SPAWN_POSITION};
use crate::Board;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    /// Rotation index 0..=3
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Occupancy matrix for the current rotation
    pub fn matrix(&self) -> &'static Shape {
        pieces::rotation(self.kind, self.rotation as usize)
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        self.matrix().minos()
    }

    pub fn color_id(&self) -> u8 {
        self.kind.color_id()
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.fits(&self.shape(), self.x, self.y)
    }
}

/// Record of the most recent settle, for drivers that log or display it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SettleEvent {
    pub lines_cleared: u32,
    pub holes: u32,
    pub aggregate_height: u32,
    pub bumpiness: u32,
    /// Tallest column after the clear
    pub max_height: u32,
    pub reward: f64,
    pub game_over: bool,
}

/// Result of one `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepResult {
    pub observation: Grid,
    pub reward: f64,
    pub terminated: bool,
    /// Always false; there is no step cap
    pub truncated: bool,
    pub info: Info,
}

/// One environment session
#[derive(Debug, Clone)]
pub struct GameState<S: PieceSource = Randomizer> {
    board: Board,
    active: Tetromino,
    source: S,
    score: f64,
    lines: u32,
    /// Pieces settled this episode
    pieces: u32,
    /// Monotonic episode id (increments on every reset after the first)
    episode: u32,
    terminated: bool,
    last_reward: f64,
    last_event: Option<SettleEvent>,
}

impl GameState<Randomizer> {
    /// Uniform piece selection seeded with `seed`
    pub fn new(seed: u32) -> Self {
        Self::from_config(&EnvConfig {
            seed,
            ..EnvConfig::default()
        })
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::with_source(Randomizer::new(config.piece_rule, config.seed))
    }
}

impl Default for GameState<Randomizer> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<S: PieceSource> GameState<S> {
    /// Start a session on an empty board with the first piece spawned
    pub fn with_source(source: S) -> Self {
        Self::from_parts(Board::new(), source)
    }

    /// Start a session on a prepared board
    ///
    /// The first piece is spawned immediately; if it does not fit the session starts
    /// terminated.
    pub fn from_parts(board: Board, mut source: S) -> Self {
        let active = Tetromino::new(source.next_piece());
        let terminated = !active.is_valid(&board);
        Self {
            board,
            active,
            source,
            score: 0.0,
            lines: 0,
            pieces: 0,
            episode: 0,
            terminated,
            last_reward: 0.0,
            last_event: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Tetromino {
        self.active
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn info(&self) -> Info {
        Info {
            score: self.score,
            lines: self.lines,
            pieces: self.pieces,
            episode: self.episode,
        }
    }

    /// Take and clear the last settle event
    pub fn take_last_event(&mut self) -> Option<SettleEvent> {
        self.last_event.take()
    }

    /// Clear the board, zero the score and spawn the first piece
    ///
    /// `seed` restarts the piece sequence; `None` continues the current one.
    /// Returns the settled board, which is always empty here.
    pub fn reset(&mut self, seed: Option<u32>) -> (Grid, Info) {
        if let Some(seed) = seed {
            self.source.reseed(seed);
        }
        self.board.clear();
        self.score = 0.0;
        self.lines = 0;
        self.pieces = 0;
        self.episode = self.episode.wrapping_add(1);
        self.terminated = false;
        self.last_reward = 0.0;
        self.last_event = None;
        if !self.spawn_piece() {
            self.terminated = true;
        }
        (self.board.to_grid(), self.info())
    }

    /// Apply one action
    pub fn step(&mut self, action: Action) -> StepResult {
        if self.terminated {
            return StepResult {
                observation: self.observation(),
                reward: 0.0,
                terminated: true,
                truncated: false,
                info: self.info(),
            };
        }

        let reward = match action {
            Action::MoveLeft => {
                self.move_left();
                self.gravity_tick()
            }
            Action::MoveRight => {
                self.move_right();
                self.gravity_tick()
            }
            Action::Rotate => {
                self.rotate();
                self.gravity_tick()
            }
            Action::HardDrop => self.hard_drop(),
        };
        self.last_reward = reward;

        StepResult {
            observation: self.observation(),
            reward,
            terminated: self.terminated,
            truncated: false,
            info: self.info(),
        }
    }

    /// Replace the active piece with a fresh one from the source
    ///
    /// Returns whether the new piece fits at the spawn position.
    pub fn spawn_piece(&mut self) -> bool {
        self.active = Tetromino::new(self.source.next_piece());
        self.active.is_valid(&self.board)
    }

    /// Collision predicate for an arbitrary shape anchored at (x, y)
    pub fn is_valid(&self, shape: &Shape, x: i8, y: i8) -> bool {
        self.board.fits(&shape.minos(), x, y)
    }

    /// Try to move the active piece
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let active = self.active;
        if !self
            .board
            .fits(&active.shape(), active.x + dx, active.y + dy)
        {
            return false;
        }
        self.active = Tetromino {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        };
        true
    }

    pub fn move_left(&mut self) -> bool {
        !self.terminated && self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        !self.terminated && self.try_move(1, 0)
    }

    /// Rotate clockwise in place; rejected if the next state does not fit
    pub fn rotate(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        let active = self.active;
        let next = Tetromino {
            rotation: (active.rotation + 1) % 4,
            ..active
        };
        if !self.is_valid(next.matrix(), next.x, next.y) {
            return false;
        }
        self.active = next;
        true
    }

    /// Drop the active piece to the lowest valid row and settle it
    ///
    /// Returns the settle reward.
    pub fn hard_drop(&mut self) -> f64 {
        if self.terminated {
            return 0.0;
        }
        while self.try_move(0, 1) {}
        self.settle()
    }

    /// Advance gravity by one row, settling the piece if it cannot fall
    ///
    /// Returns 0 when the piece only moved, otherwise the settle reward.
    pub fn gravity_tick(&mut self) -> f64 {
        if self.terminated {
            return 0.0;
        }
        if self.try_move(0, 1) {
            0.0
        } else {
            self.settle()
        }
    }

    /// Write the piece into the board, clear lines, spawn and score
    fn settle(&mut self) -> f64 {
        let piece = self.active;
        // Pieces only ever move down from row 0, so every mino is on the board here
        let locked = self
            .board
            .lock_piece(&piece.shape(), piece.x, piece.y, piece.kind);
        debug_assert!(locked, "settled piece overlaps the board: {:?}", piece);

        let lines_cleared = self.board.clear_full_rows().len();
        self.lines += lines_cleared as u32;
        self.pieces += 1;

        let spawned = self.spawn_piece();
        let game_over = !spawned;

        let metrics = BoardMetrics::of(&self.board);
        let reward = shaped_reward(lines_cleared, game_over, &metrics);
        self.score += reward;
        if game_over {
            self.terminated = true;
        }

        self.last_event = Some(SettleEvent {
            lines_cleared: lines_cleared as u32,
            holes: metrics.holes,
            aggregate_height: metrics.aggregate_height,
            bumpiness: metrics.bumpiness,
            max_height: metrics.max_height,
            reward,
            game_over,
        });

        reward
    }

    /// Settled board with the active piece overlaid; owned copy
    pub fn observation(&self) -> Grid {
        let mut grid = self.board.to_grid();
        if !self.terminated {
            overlay_active(&mut grid, &ActiveSnapshot::from(self.active));
        }
        grid
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = Some(ActiveSnapshot::from(self.active));
        out.next = self.source.peek();
        out.terminated = self.terminated;
        out.last_reward = self.last_reward;
        out.info = self.info();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequencePieces;

    fn session(kinds: &[PieceKind]) -> GameState<SequencePieces> {
        GameState::with_source(SequencePieces::new(kinds.to_vec()).unwrap())
    }

    #[test]
    fn test_new_session() {
        let state = GameState::new(12345);
        assert!(!state.terminated());
        assert_eq!(state.score(), 0.0);
        assert_eq!(state.active().x, 3);
        assert_eq!(state.active().y, 0);
        assert_eq!(state.active().rotation, 0);
        assert_eq!(state.board().occupied_count(), 0);
    }

    #[test]
    fn test_tetromino_new() {
        let piece = Tetromino::new(PieceKind::T);
        assert_eq!(piece.kind, PieceKind::T);
        assert_eq!(piece.rotation, 0);
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!(piece.color_id(), 3);
    }

    #[test]
    fn test_moves_stop_at_walls() {
        let mut state = session(&[PieceKind::O]);
        let mut moved = 0;
        for _ in 0..10 {
            if state.move_left() {
                moved += 1;
            }
        }
        assert_eq!(moved, 3);
        assert_eq!(state.active().x, 0);

        let mut moved = 0;
        for _ in 0..20 {
            if state.move_right() {
                moved += 1;
            }
        }
        assert_eq!(moved, 8);
        assert_eq!(state.active().x, 8);
    }

    #[test]
    fn test_rotation_without_kicks_fails_at_wall() {
        let mut state = session(&[PieceKind::I]);
        // Vertical I in column 2 of its matrix, then push it against the right wall
        assert!(state.rotate());
        while state.move_right() {}
        assert_eq!(state.active().x, 7);
        // Horizontal I would need columns 7..=10
        assert!(!state.rotate());
        assert_eq!(state.active().rotation, 1);
    }

    #[test]
    fn test_o_rotation_is_accepted_and_harmless() {
        let mut state = session(&[PieceKind::O]);
        let before = state.active().shape();
        assert!(state.rotate());
        assert_eq!(state.active().shape(), before);
    }

    #[test]
    fn test_gravity_tick_moves_without_reward() {
        let mut state = session(&[PieceKind::T]);
        assert_eq!(state.gravity_tick(), 0.0);
        assert_eq!(state.active().y, 1);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_gravity_settles_on_floor() {
        let mut state = session(&[PieceKind::O, PieceKind::T]);
        // O bottom row sits at y+1; floor reached at y = 18
        for _ in 0..18 {
            assert_eq!(state.gravity_tick(), 0.0);
        }
        assert_eq!(state.active().y, 18);
        let reward = state.gravity_tick();
        assert!(reward < 0.0);
        assert_eq!(state.board().occupied_count(), 4);
        assert_eq!(state.active().kind, PieceKind::T);
        let ev = state.take_last_event().unwrap();
        assert_eq!(ev.lines_cleared, 0);
        assert!(!ev.game_over);
    }

    #[test]
    fn test_hard_drop_settles_and_spawns() {
        let mut state = session(&[PieceKind::I, PieceKind::O]);
        let reward = state.hard_drop();
        // I lies flat on row 19, columns 3..=6: heights 1,1,1,1 -> agg 4, bump 2
        assert!((reward - (-0.4 - 0.4)).abs() < 1e-9);
        assert_eq!(state.board().get(3, 19), Some(Some(PieceKind::I)));
        assert_eq!(state.board().get(6, 19), Some(Some(PieceKind::I)));
        assert_eq!(state.active().kind, PieceKind::O);
        assert_eq!(state.info().pieces, 1);
    }

    #[test]
    fn test_step_after_termination_is_frozen() {
        let mut board = Board::new();
        for y in 0..2 {
            for x in 3..5 {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
        let mut state =
            GameState::from_parts(board.clone(), SequencePieces::new(vec![PieceKind::O]).unwrap());
        assert!(state.terminated());

        let r = state.step(Action::HardDrop);
        assert_eq!(r.reward, 0.0);
        assert!(r.terminated);
        assert!(!r.truncated);
        assert_eq!(state.board(), &board);
        assert_eq!(r.observation, board.to_grid());
    }

    #[test]
    fn test_reset_reseeds_and_counts_episodes() {
        fn kinds(state: &mut GameState) -> Vec<PieceKind> {
            (0..5)
                .map(|_| {
                    let k = state.active().kind;
                    state.hard_drop();
                    k
                })
                .collect()
        }

        let mut state = GameState::new(9);
        state.reset(Some(9));
        let first = kinds(&mut state);

        let (grid, info) = state.reset(Some(9));
        assert!(grid.iter().flatten().all(|&v| v == 0));
        assert_eq!(info.score, 0.0);
        assert_eq!(info.lines, 0);
        assert_eq!(info.pieces, 0);
        assert_eq!(info.episode, 2);
        assert!(!state.terminated());

        let second = kinds(&mut state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_observation_is_a_copy() {
        let mut state = session(&[PieceKind::T]);
        let mut obs = state.observation();
        obs[19][0] = 7;
        assert_eq!(state.board().get(0, 19), Some(None));
        let r = state.step(Action::MoveLeft);
        assert_eq!(r.observation[19][0], 0);
    }

    #[test]
    fn test_snapshot_reports_next_piece() {
        let state = session(&[PieceKind::S, PieceKind::Z]);
        let snap = state.snapshot();
        assert_eq!(snap.active.map(|a| a.kind), Some(PieceKind::S));
        assert_eq!(snap.next, Some(PieceKind::Z));
        assert!(!snap.terminated);
    }
}
