//! Random-agent episodes.
//!
//! ```text
//! rollout [--episodes N] [--seed S] [--max-steps N] [--render]
//! ```
//!
//! With `--render` every step is drawn in the terminal at `RENDER_FPS`; `q` stops early.

use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};

use tetris_env::core::EnvConfig;
use tetris_env::input::should_quit;
use tetris_env::rollout::{parse_rollout_args, run_rollout, EpisodeSummary, RolloutConfig};
use tetris_env::term::{FrameBuffer, FrameLimiter, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let env_config = EnvConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let defaults = RolloutConfig {
        seed: env_config.seed,
        ..RolloutConfig::default()
    };
    let config = parse_rollout_args(&args, defaults)?;

    println!(
        "[Rollout] {} episodes, seed {}, piece rule {}",
        config.episodes,
        config.seed,
        env_config.piece_rule.as_str()
    );

    let summaries = if config.render {
        // The alternate screen swallows output, so report once it is gone
        let summaries = run_rendered(&env_config, &config)?;
        summaries.iter().for_each(print_episode);
        summaries
    } else {
        run_rollout(&env_config, &config, |_| Ok(()), print_episode)?
    };

    if !summaries.is_empty() {
        let mean = summaries.iter().map(|s| s.score).sum::<f64>() / summaries.len() as f64;
        println!("[Rollout] mean score {:.2}", mean);
    }
    Ok(())
}

fn print_episode(s: &EpisodeSummary) {
    println!(
        "[Rollout] episode {} score {:.1} lines {} pieces {} steps {}{}",
        s.episode,
        s.score,
        s.lines,
        s.pieces,
        s.steps,
        if s.terminated { "" } else { " (cut off)" }
    );
}

fn run_rendered(env_config: &EnvConfig, config: &RolloutConfig) -> Result<Vec<EpisodeSummary>> {
    let mut term = TerminalRenderer::new();
    if let Err(e) = term.enter() {
        let _ = term.exit();
        return Err(e);
    }

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = Duration::from_millis(FrameLimiter::default().interval_ms());

    let result = run_rollout(
        env_config,
        config,
        |env| {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            view.render_into(&env.snapshot(), Viewport::new(w, h), &mut fb);
            term.draw(&fb)?;
            if event::poll(frame)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        return Err(anyhow!("rollout stopped from the keyboard"));
                    }
                }
            }
            Ok(())
        },
        |_| {},
    );

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}
