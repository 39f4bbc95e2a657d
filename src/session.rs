use log::{error, info, warn};
use shakmaty::Color;
use thiserror::Error;

use crate::EngineTransport;
use crate::board::{Board, Coordinate};
use crate::game_state::{GameState, MoveError};
use crate::input::{ClickOutcome, InputState, PendingMove};
use crate::protocol::MoveRequest;
use crate::uci::{ParseUciError, UciMove};

/// Errors surfaced to the player. None of them leave the board half-updated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no piece on source square {0}")]
    InvalidSourceSquare(Coordinate),

    #[error(transparent)]
    MalformedUci(#[from] ParseUciError),

    #[error("error communicating with engine: {0}")]
    NetworkFailure(String),

    #[error("still waiting for the engine's reply")]
    EngineBusy,

    #[error("no move is waiting for the engine")]
    NoPendingMove,
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::InvalidSourceSquare(coord) => SessionError::InvalidSourceSquare(coord),
            MoveError::MalformedUci(e) => SessionError::MalformedUci(e),
        }
    }
}

/// One completed exchange with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player_move: UciMove,
    pub fen_sent: String,
    pub engine_move: UciMove,
    /// Fewer than two kings remain after the engine's move
    pub game_over: bool,
}

/// Read-only snapshot handed to a [`BoardRenderer`](crate::BoardRenderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardView<'a> {
    pub board: &'a Board,
    pub selection: Option<Coordinate>,
    pub side_to_move: Color,
    pub awaiting_engine: bool,
}

/// A single game against the backend engine.
///
/// Owns the board tracker, the input state and the game id handed out by
/// `/start`. The game id is fetched once and never refreshed.
#[derive(Debug)]
pub struct GameSession<T> {
    transport: T,
    game_id: String,
    state: GameState,
    input: InputState,
}

impl<T: EngineTransport> GameSession<T> {
    /// Ask the backend for a game id and set up the starting position.
    pub fn start(mut transport: T) -> Result<Self, SessionError> {
        info!("starting new game via /start");
        let game_id = transport.start_game().map_err(|e| {
            error!("failed to start game: {e}");
            SessionError::NetworkFailure(e.to_string())
        })?;
        info!("received game_id {game_id}");
        Ok(Self::with_game_id(transport, game_id))
    }

    /// Set up a session with a known game id, skipping `/start`.
    pub fn with_game_id(transport: T, game_id: impl Into<String>) -> Self {
        Self {
            transport,
            game_id: game_id.into(),
            state: GameState::new(),
            input: InputState::Idle,
        }
    }

    #[inline]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            board: self.state.board(),
            selection: self.input.selection(),
            side_to_move: self.state.side_to_move(),
            awaiting_engine: self.input.is_awaiting_engine(),
        }
    }

    /// Reset the board and input. The game id is kept.
    pub fn reset(&mut self) {
        self.state.initialize();
        self.input = InputState::Idle;
    }

    /// Two-click input. A submitted move still needs [`Self::finish_turn`].
    pub fn click(&mut self, coord: Coordinate) -> Result<ClickOutcome, SessionError> {
        Ok(self.input.click(coord, &mut self.state)?)
    }

    /// Drag-and-drop input: move whatever sits on `from` to `to`.
    pub fn drop_piece(
        &mut self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<PendingMove, SessionError> {
        self.submit(UciMove::new(from, to))
    }

    /// Typed input, e.g. `"e2e4"`.
    pub fn submit_uci(&mut self, uci: &str) -> Result<PendingMove, SessionError> {
        self.submit(uci.parse()?)
    }

    fn submit(&mut self, mv: UciMove) -> Result<PendingMove, SessionError> {
        if self.input.is_awaiting_engine() {
            warn!("move {mv} rejected: engine is thinking");
            return Err(SessionError::EngineBusy);
        }
        Ok(self.input.submit(mv, &mut self.state)?)
    }

    /// Send the pending move to the engine and apply its reply.
    ///
    /// Input returns to idle whatever the outcome. On failure the player's
    /// move stays applied, so Black remains to move and clicks stay inert
    /// until [`Self::reset`].
    pub fn finish_turn(&mut self) -> Result<TurnOutcome, SessionError> {
        let InputState::AwaitingEngine(pending) = &self.input else {
            return Err(SessionError::NoPendingMove);
        };
        let pending = pending.clone();
        let result = self.exchange(pending);
        self.input.finish();
        result
    }

    /// Submit a typed move and wait for the engine's reply.
    pub fn play(&mut self, uci: &str) -> Result<TurnOutcome, SessionError> {
        self.submit_uci(uci)?;
        self.finish_turn()
    }

    fn exchange(&mut self, pending: PendingMove) -> Result<TurnOutcome, SessionError> {
        let uci = pending.player_move.to_string();
        let request = MoveRequest {
            game_id: &self.game_id,
            uci: &uci,
            fen: &pending.fen,
        };
        info!("sending move {uci} with FEN {}", pending.fen);

        let response = self.transport.request_move(&request).map_err(|e| {
            error!("engine error: {e}");
            SessionError::NetworkFailure(e.to_string())
        })?;

        let engine_move = response
            .best_move
            .parse::<UciMove>()
            .inspect_err(|e| error!("engine reply rejected: {e}"))?;
        self.state.apply(engine_move)?;
        info!("engine plays {engine_move}");

        let game_over = self.state.is_game_over();
        if game_over {
            info!("game over");
        }

        Ok(TurnOutcome {
            player_move: pending.player_move,
            fen_sent: pending.fen,
            engine_move,
            game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::STARTING_FEN;
    use crate::mock::ScriptedEngine;

    fn sq(square: &str) -> Coordinate {
        square.parse().expect("test square should be valid")
    }

    #[test]
    fn test_start_caches_game_id() {
        let session = GameSession::start(ScriptedEngine::new("game-1")).expect("start succeeds");

        assert_eq!(session.game_id(), "game-1");
        assert_eq!(session.state().to_fen(), STARTING_FEN);
    }

    #[test]
    fn test_start_failure_is_network_failure() {
        let result = GameSession::start(ScriptedEngine::unreachable());

        assert!(matches!(result, Err(SessionError::NetworkFailure(_))));
    }

    #[test]
    fn test_play_sends_fen_after_player_move() {
        let mut engine = ScriptedEngine::new("g");
        engine.push_reply("e7e5");
        let mut session = GameSession::with_game_id(engine, "g");

        let outcome = session.play("e2e4").expect("turn completes");

        assert_eq!(
            outcome.fen_sent,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(outcome.engine_move.to_string(), "e7e5");
        assert!(!outcome.game_over);
        assert_eq!(session.state().side_to_move(), Color::White);
        assert_eq!(session.state().fullmove_number(), 2);
        assert_eq!(*session.input(), InputState::Idle);

        let sent = &session.transport().requests()[0];
        assert_eq!(sent.game_id, "g");
        assert_eq!(sent.uci, "e2e4");
        assert_eq!(sent.fen, outcome.fen_sent);
    }

    #[test]
    fn test_drop_while_awaiting_engine_is_rejected() {
        let mut session = GameSession::with_game_id(ScriptedEngine::new("g"), "g");
        session.drop_piece(sq("e2"), sq("e4")).expect("first drop applies");
        let before = session.state().clone();

        let result = session.drop_piece(sq("d2"), sq("d4"));

        assert_eq!(result, Err(SessionError::EngineBusy));
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn test_finish_turn_without_pending_move() {
        let mut session = GameSession::with_game_id(ScriptedEngine::new("g"), "g");

        assert_eq!(session.finish_turn(), Err(SessionError::NoPendingMove));
    }

    #[test]
    fn test_reset_keeps_game_id() {
        let mut engine = ScriptedEngine::new("g");
        engine.push_reply("e7e5");
        let mut session = GameSession::start(engine).expect("start succeeds");
        session.play("e2e4").expect("turn completes");

        session.reset();

        assert_eq!(session.game_id(), "g");
        assert_eq!(session.state().to_fen(), STARTING_FEN);
    }

    #[test]
    fn test_move_error_conversion() {
        assert_eq!(
            SessionError::from(MoveError::InvalidSourceSquare(sq("e4"))),
            SessionError::InvalidSourceSquare(sq("e4"))
        );
    }
}
