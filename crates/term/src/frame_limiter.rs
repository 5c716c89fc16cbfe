//! Render pacing for the interactive loop.
//!
//! Input is polled continuously; frames are only drawn when something changed and
//! at most once per frame interval.

use crate::types::RENDER_FPS;

#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval_ms: u64,
    last_render_ms: u64,
    has_rendered: bool,
}

impl FrameLimiter {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_render_ms: 0,
            has_rendered: false,
        }
    }

    /// Limiter for `fps` frames per second (0 is treated as 1).
    pub fn from_fps(fps: u32) -> Self {
        Self::new(1000 / u64::from(fps.max(1)))
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Decide whether to draw a frame now.
    ///
    /// The first call always renders. After that a frame is drawn only when `dirty`
    /// and a full interval has passed since the last one; callers keep `dirty` set
    /// until this returns true.
    pub fn should_render(&mut self, now_ms: u64, dirty: bool) -> bool {
        if !self.has_rendered {
            self.has_rendered = true;
            self.last_render_ms = now_ms;
            return true;
        }

        if dirty && now_ms.saturating_sub(self.last_render_ms) >= self.interval_ms {
            self.last_render_ms = now_ms;
            return true;
        }

        false
    }

    /// Time left until a pending frame may be drawn.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.interval_ms
            .saturating_sub(now_ms.saturating_sub(self.last_render_ms))
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::from_fps(RENDER_FPS)
    }
}
