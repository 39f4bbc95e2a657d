//! JSON bodies exchanged with the game backend.

use serde::{Deserialize, Serialize};

/// Reply to `GET /start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub game_id: String,
}

/// Body of `POST /move`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRequest<'a> {
    pub game_id: &'a str,
    #[serde(rename = "move")]
    pub uci: &'a str,
    pub fen: &'a str,
}

/// Reply to `POST /move`. `best_move` is untrusted until parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub best_move: String,
}
