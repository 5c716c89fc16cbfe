//! Terminal runner for human play (default binary).
//!
//! Each key press is one `step`; there is no real-time gravity. Input is polled
//! continuously while drawing is paced at `RENDER_FPS`, using crossterm for input
//! and the framebuffer renderer for output.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tetris_env::core::{EnvConfig, GameState, Info};
use tetris_env::input::{handle_key_event, should_quit, should_restart};
use tetris_env::term::{FrameBuffer, FrameLimiter, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = EnvConfig::from_env();

    let mut term = TerminalRenderer::new();
    if let Err(e) = term.enter() {
        let _ = term.exit();
        return Err(e);
    }

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();

    let finished = result?;
    for info in &finished {
        println!(
            "[Play] episode {} game over: score {:.1}, lines {}, pieces {}",
            info.episode, info.score, info.lines, info.pieces
        );
    }
    Ok(())
}

/// Run until quit; returns the final info of every episode that ended in game over
fn run(term: &mut TerminalRenderer, config: &EnvConfig) -> Result<Vec<Info>> {
    let mut env = GameState::from_config(config);
    env.reset(Some(config.seed));

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut limiter = FrameLimiter::default();
    let started = Instant::now();
    let mut dirty = true;
    let mut finished = Vec::new();

    loop {
        let now_ms = started.elapsed().as_millis() as u64;
        if limiter.should_render(now_ms, dirty) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            view.render_into(&env.snapshot(), Viewport::new(w, h), &mut fb);
            term.draw(&fb)?;
            dirty = false;
        }

        let timeout = if dirty {
            limiter.remaining_ms(now_ms)
        } else {
            limiter.interval_ms()
        };
        if !event::poll(Duration::from_millis(timeout))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(finished);
                }
                if should_restart(key) {
                    env.reset(None);
                    dirty = true;
                    continue;
                }
                if let Some(action) = handle_key_event(key) {
                    let was_running = !env.terminated();
                    let result = env.step(action);
                    if was_running && result.terminated {
                        finished.push(result.info);
                    }
                    dirty = true;
                }
            }
            Event::Resize(_, _) => {
                term.invalidate();
                dirty = true;
            }
            _ => {}
        }
    }
}
