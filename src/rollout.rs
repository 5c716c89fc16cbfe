//! Random-agent episodes, headless or watched through a per-step hook.

use anyhow::{anyhow, Result};

use crate::core::config::parse_seed;
use crate::core::{EnvConfig, GameState, PieceSource, SimpleRng};
use crate::types::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutConfig {
    pub episodes: u32,
    pub seed: u32,
    /// Episodes still running after this many steps are cut off
    pub max_steps: u32,
    /// Draw every step in the terminal
    pub render: bool,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            episodes: 10,
            seed: EnvConfig::default().seed,
            max_steps: 10_000,
            render: false,
        }
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub score: f64,
    pub lines: u32,
    pub pieces: u32,
    pub steps: u32,
    pub terminated: bool,
}

/// Parse `--episodes N`, `--seed S`, `--max-steps N` and `--render` (program name excluded)
pub fn parse_rollout_args(args: &[String], defaults: RolloutConfig) -> Result<RolloutConfig> {
    let mut config = defaults;
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--render" {
            config.render = true;
            i += 1;
            continue;
        }
        let value = || {
            args.get(i + 1)
                .ok_or_else(|| anyhow!("rollout: missing value for {}", flag))
        };
        match flag {
            "--episodes" => {
                let v = value()?;
                config.episodes = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("rollout: invalid --episodes value: {}", v))?;
            }
            "--seed" => {
                let v = value()?;
                config.seed = parse_seed(v).map_err(|e| anyhow!("rollout: {}", e))?;
            }
            "--max-steps" => {
                let v = value()?;
                config.max_steps = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("rollout: invalid --max-steps value: {}", v))?;
            }
            other => {
                return Err(anyhow!("rollout: unknown argument: {}", other));
            }
        }
        i += 2;
    }
    Ok(config)
}

/// Play one episode from a fresh reset, choosing actions with `agent`
///
/// `on_step` sees the state after the reset and after every step; an error from it
/// stops the episode.
pub fn run_episode<S: PieceSource>(
    env: &mut GameState<S>,
    agent: &mut SimpleRng,
    seed: Option<u32>,
    max_steps: u32,
    mut on_step: impl FnMut(&GameState<S>) -> Result<()>,
) -> Result<EpisodeSummary> {
    env.reset(seed);
    on_step(env)?;
    let mut steps = 0;
    let mut terminated = env.terminated();
    while !terminated && steps < max_steps {
        let action = Action::ALL[agent.next_range(Action::COUNT as u32) as usize];
        terminated = env.step(action).terminated;
        steps += 1;
        on_step(env)?;
    }

    Ok(EpisodeSummary {
        episode: env.episode(),
        score: env.score(),
        lines: env.lines(),
        pieces: env.info().pieces,
        steps,
        terminated,
    })
}

/// Run `config.episodes` episodes; the first reset uses `config.seed` and the rest
/// continue the piece sequence
pub fn run_rollout(
    env_config: &EnvConfig,
    config: &RolloutConfig,
    mut on_step: impl FnMut(&GameState) -> Result<()>,
    mut on_episode: impl FnMut(&EpisodeSummary),
) -> Result<Vec<EpisodeSummary>> {
    let mut env = GameState::from_config(env_config);
    let mut agent = SimpleRng::new(config.seed ^ 0x9e37_79b9);
    let mut summaries = Vec::with_capacity(config.episodes as usize);
    for i in 0..config.episodes {
        let seed = (i == 0).then_some(config.seed);
        let summary = run_episode(&mut env, &mut agent, seed, config.max_steps, &mut on_step)?;
        on_episode(&summary);
        summaries.push(summary);
    }
    Ok(summaries)
}
