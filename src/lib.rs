pub mod board;
pub mod config;
pub mod game_state;
pub mod http;
pub mod input;
pub mod mock;
pub mod protocol;
pub mod session;
pub mod terminal;
pub mod uci;

use protocol::{MoveRequest, MoveResponse};

/// Trait for talking to the game backend.
///
/// Abstracts over the HTTP client and scripted mock engines,
/// providing a uniform interface for `GameSession`.
pub trait EngineTransport {
    /// Error type for request failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Ask the backend for a new game id.
    fn start_game(&mut self) -> Result<String, Self::Error>;

    /// Send the player's move with the resulting FEN and return the engine's reply.
    fn request_move(&mut self, request: &MoveRequest<'_>) -> Result<MoveResponse, Self::Error>;
}

/// Trait for drawing the board to the player.
///
/// The output side of the game loop; mirrors [`EngineTransport`]
/// on the network side.
pub trait BoardRenderer {
    /// Error type for render failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Draw the given view of the session.
    fn show(&mut self, view: &session::BoardView<'_>) -> Result<(), Self::Error>;
}
