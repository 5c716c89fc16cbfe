//! Per-connection session.
//!
//! Each trainer connection owns one independent `GameState`, created on its first
//! `reset`. Request handling is synchronous so it can be tested without sockets.

use crate::core::{EnvConfig, GameState};
use crate::protocol::{
    create_error, create_observation, create_reset, create_snapshot, parse_request, ErrorCode,
    Request, Response,
};

pub struct ClientSession {
    config: EnvConfig,
    state: Option<GameState>,
}

impl ClientSession {
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Parse and handle one inbound line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match parse_request(line) {
            Ok(req) => self.handle_request(req),
            Err(err) => Response::Error(err),
        }
    }

    pub fn handle_request(&mut self, req: Request) -> Response {
        match req {
            Request::Reset { seq, seed } => {
                // A fresh session starts from the configured seed unless told otherwise
                let seed = match self.state {
                    Some(_) => seed,
                    None => seed.or(Some(self.config.seed)),
                };
                let config = self.config;
                let state = self
                    .state
                    .get_or_insert_with(|| GameState::from_config(&config));
                let (board, info) = state.reset(seed);
                Response::Reset(create_reset(seq, board, info))
            }
            Request::Step { seq, action } => {
                let action = match action.resolve() {
                    Ok(a) => a,
                    Err(e) => {
                        return Response::Error(create_error(
                            seq,
                            ErrorCode::InvalidAction,
                            &e.message(),
                        ))
                    }
                };
                let Some(state) = self.state.as_mut() else {
                    return not_reset(seq);
                };
                let result = state.step(action);
                let last_event = state.take_last_event();
                Response::Observation(create_observation(seq, &result, last_event))
            }
            Request::Snapshot { seq } => match self.state.as_ref() {
                Some(state) => Response::Snapshot(create_snapshot(seq, &state.snapshot())),
                None => not_reset(seq),
            },
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }
}

fn not_reset(seq: u64) -> Response {
    Response::Error(create_error(
        seq,
        ErrorCode::NotReset,
        "send a reset request before step or snapshot",
    ))
}
