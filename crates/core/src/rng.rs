//! RNG module - seedable piece sources
//!
//! The session never reads ambient randomness; it owns a [`PieceSource`] that is
//! reseeded on reset. Three sources are provided:
//!
//! - [`UniformPieces`]: each piece drawn uniformly from the 7 kinds (the default rule)
//! - [`PieceQueue`]: the "7-bag" randomizer, one of each kind per shuffled bag
//! - [`SequencePieces`]: a fixed cyclic sequence, for reproducible scenarios
//!
//! All of them are driven by a small LCG so the same seed always yields the same game.

use crate::config::PieceRule;
use crate::types::PieceKind;

/// Supplies the kind of each newly spawned piece
pub trait PieceSource {
    /// Draw the next piece
    fn next_piece(&mut self) -> PieceKind;

    /// Restart the sequence from `seed`
    fn reseed(&mut self, seed: u32);

    /// Preview the piece the next draw will return, without consuming it
    fn peek(&self) -> Option<PieceKind> {
        None
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high half of the state; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Uniform piece selection
#[derive(Debug, Clone)]
pub struct UniformPieces {
    rng: SimpleRng,
}

impl UniformPieces {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl PieceSource for UniformPieces {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    fn reseed(&mut self, seed: u32) {
        self.rng = SimpleRng::new(seed);
    }

    fn peek(&self) -> Option<PieceKind> {
        let mut preview = self.rng.clone();
        Some(PieceKind::ALL[preview.next_range(PieceKind::ALL.len() as u32) as usize])
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        queue.refill_bag();
        queue
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl PieceSource for PieceQueue {
    fn next_piece(&mut self) -> PieceKind {
        self.draw()
    }

    fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    fn peek(&self) -> Option<PieceKind> {
        if let Some(&kind) = self.bag.get(self.bag_index) {
            return Some(kind);
        }

        // Preview the next bag on a copy of the RNG so draw() stays consistent.
        let mut preview_rng = self.rng.clone();
        let mut next_bag = PieceKind::ALL;
        preview_rng.shuffle(&mut next_bag);
        Some(next_bag[0])
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Fixed cyclic sequence of pieces; the seed is ignored and reseeding rewinds
#[derive(Debug, Clone)]
pub struct SequencePieces {
    sequence: Vec<PieceKind>,
    index: usize,
}

impl SequencePieces {
    /// Returns None for an empty sequence
    pub fn new(sequence: Vec<PieceKind>) -> Option<Self> {
        if sequence.is_empty() {
            return None;
        }
        Some(Self { sequence, index: 0 })
    }
}

impl PieceSource for SequencePieces {
    fn next_piece(&mut self) -> PieceKind {
        let kind = self.sequence[self.index % self.sequence.len()];
        self.index = (self.index + 1) % self.sequence.len();
        kind
    }

    fn reseed(&mut self, _seed: u32) {
        self.index = 0;
    }

    fn peek(&self) -> Option<PieceKind> {
        self.sequence.get(self.index % self.sequence.len()).copied()
    }
}

/// Piece source selected by [`PieceRule`]
#[derive(Debug, Clone)]
pub enum Randomizer {
    Uniform(UniformPieces),
    Bag(PieceQueue),
}

impl Randomizer {
    pub fn new(rule: PieceRule, seed: u32) -> Self {
        match rule {
            PieceRule::Uniform => Randomizer::Uniform(UniformPieces::new(seed)),
            PieceRule::Bag7 => Randomizer::Bag(PieceQueue::new(seed)),
        }
    }

    pub fn rule(&self) -> PieceRule {
        match self {
            Randomizer::Uniform(_) => PieceRule::Uniform,
            Randomizer::Bag(_) => PieceRule::Bag7,
        }
    }
}

impl PieceSource for Randomizer {
    fn next_piece(&mut self) -> PieceKind {
        match self {
            Randomizer::Uniform(s) => s.next_piece(),
            Randomizer::Bag(s) => s.next_piece(),
        }
    }

    fn reseed(&mut self, seed: u32) {
        match self {
            Randomizer::Uniform(s) => s.reseed(seed),
            Randomizer::Bag(s) => s.reseed(seed),
        }
    }

    fn peek(&self) -> Option<PieceKind> {
        match self {
            Randomizer::Uniform(s) => s.peek(),
            Randomizer::Bag(s) => s.peek(),
        }
    }
}
