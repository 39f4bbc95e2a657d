use std::collections::VecDeque;

use thiserror::Error;

use crate::EngineTransport;
use crate::protocol::{MoveRequest, MoveResponse};

/// Failures a [`ScriptedEngine`] can be told to produce.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MockEngineError {
    #[error("backend unreachable")]
    Unreachable,
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("no scripted reply left")]
    Exhausted,
}

/// A request as received by the mock, with owned fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub game_id: String,
    pub uci: String,
    pub fen: String,
}

/// A scriptable mock backend.
///
/// Replies are queued up front and handed out one per `/move` request.
/// Every request is recorded so tests can check what was sent.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    game_id: Result<String, MockEngineError>,
    replies: VecDeque<Result<String, MockEngineError>>,
    requests: Vec<RecordedRequest>,
}

impl ScriptedEngine {
    /// Create a backend that hands out `game_id` from `/start`.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: Ok(game_id.into()),
            replies: VecDeque::new(),
            requests: Vec::new(),
        }
    }

    /// Create a backend whose `/start` fails.
    pub fn unreachable() -> Self {
        Self {
            game_id: Err(MockEngineError::Unreachable),
            replies: VecDeque::new(),
            requests: Vec::new(),
        }
    }

    /// Queue a `best_move` reply. The string is passed through unvalidated.
    pub fn push_reply(&mut self, best_move: &str) {
        self.replies.push_back(Ok(best_move.to_string()));
    }

    /// Queue whitespace separated replies, e.g. `"e7e5 b8c6"`.
    pub fn push_script(&mut self, script: &str) {
        for best_move in script.split_whitespace() {
            self.push_reply(best_move);
        }
    }

    /// Queue a failed `/move` request.
    pub fn push_failure(&mut self, error: MockEngineError) {
        self.replies.push_back(Err(error));
    }

    /// Requests received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    /// Number of queued replies not yet handed out.
    #[inline]
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }
}

impl EngineTransport for ScriptedEngine {
    type Error = MockEngineError;

    fn start_game(&mut self) -> Result<String, Self::Error> {
        self.game_id.clone()
    }

    fn request_move(&mut self, request: &MoveRequest<'_>) -> Result<MoveResponse, Self::Error> {
        self.requests.push(RecordedRequest {
            game_id: request.game_id.to_string(),
            uci: request.uci.to_string(),
            fen: request.fen.to_string(),
        });
        let best_move = self
            .replies
            .pop_front()
            .unwrap_or(Err(MockEngineError::Exhausted))?;
        Ok(MoveResponse { best_move })
    }
}
