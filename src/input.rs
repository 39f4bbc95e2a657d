use log::debug;
use shakmaty::Color;

use crate::board::Coordinate;
use crate::game_state::{GameState, MoveError};
use crate::uci::UciMove;

/// The side played from this client. The engine always answers as the other side.
pub const LOCAL_SIDE: Color = Color::White;

/// A move applied locally and waiting for the engine's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub player_move: UciMove,
    /// FEN after the player's move, as sent to the backend
    pub fen: String,
}

/// Input state of the board UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputState {
    /// Nothing selected; a click on one of our pieces selects it
    #[default]
    Idle,
    /// First click of a two-click move
    Selected(Coordinate),
    /// A move was submitted; input is inert until the engine replies
    AwaitingEngine(PendingMove),
}

/// Result of feeding one click into [`InputState::click`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click had no effect
    Ignored,
    /// A piece is now selected
    Selected(Coordinate),
    /// The selected piece was moved; the pending move must be sent to the engine
    Submitted(PendingMove),
}

impl InputState {
    /// The highlighted square, if a piece is selected.
    #[inline]
    pub fn selection(&self) -> Option<Coordinate> {
        match self {
            InputState::Selected(coord) => Some(*coord),
            InputState::Idle | InputState::AwaitingEngine(_) => None,
        }
    }

    #[inline]
    pub fn is_awaiting_engine(&self) -> bool {
        matches!(self, InputState::AwaitingEngine(_))
    }

    /// Process a click on `coord`.
    ///
    /// A second click always leaves `Selected`, whether the move applied or not.
    pub fn click(
        &mut self,
        coord: Coordinate,
        state: &mut GameState,
    ) -> Result<ClickOutcome, MoveError> {
        if state.side_to_move() != LOCAL_SIDE {
            debug!("click on {coord} ignored: not our turn");
            return Ok(ClickOutcome::Ignored);
        }

        match *self {
            InputState::AwaitingEngine(_) => {
                debug!("click on {coord} ignored: engine is thinking");
                Ok(ClickOutcome::Ignored)
            }
            InputState::Idle => match state.board().piece_at(coord) {
                Some(piece) if piece.color == LOCAL_SIDE => {
                    *self = InputState::Selected(coord);
                    Ok(ClickOutcome::Selected(coord))
                }
                _ => Ok(ClickOutcome::Ignored),
            },
            InputState::Selected(from) => {
                let mv = UciMove::new(from, coord);
                *self = InputState::Idle;
                let pending = self.submit(mv, state)?;
                Ok(ClickOutcome::Submitted(pending))
            }
        }
    }

    /// Apply `mv` locally and enter [`InputState::AwaitingEngine`].
    ///
    /// Used by the second click and by drag-and-drop. On failure the state
    /// becomes `Idle` and the board is untouched.
    pub fn submit(
        &mut self,
        mv: UciMove,
        state: &mut GameState,
    ) -> Result<PendingMove, MoveError> {
        debug!("player move {mv}");
        if let Err(e) = state.apply(mv) {
            *self = InputState::Idle;
            return Err(e);
        }
        let pending = PendingMove {
            player_move: mv,
            fen: state.to_fen(),
        };
        *self = InputState::AwaitingEngine(pending.clone());
        Ok(pending)
    }

    /// Leave `AwaitingEngine` once the round trip is over, successful or not.
    #[inline]
    pub fn finish(&mut self) {
        *self = InputState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(square: &str) -> Coordinate {
        square.parse().expect("test square should be valid")
    }

    #[test]
    fn test_click_own_piece_selects() {
        let mut state = GameState::new();
        let mut input = InputState::Idle;

        let outcome = input.click(sq("e2"), &mut state).expect("no move attempted");

        assert_eq!(outcome, ClickOutcome::Selected(sq("e2")));
        assert_eq!(input.selection(), Some(sq("e2")));
    }

    #[test]
    fn test_click_empty_or_opponent_is_noop() {
        let mut state = GameState::new();
        let mut input = InputState::Idle;

        for square in ["e4", "e7"] {
            let outcome = input.click(sq(square), &mut state).expect("no move attempted");
            assert_eq!(outcome, ClickOutcome::Ignored, "click on {square}");
            assert_eq!(input, InputState::Idle);
        }
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_second_click_submits_move() {
        let mut state = GameState::new();
        let mut input = InputState::Idle;

        input.click(sq("e2"), &mut state).expect("select");
        let outcome = input.click(sq("e4"), &mut state).expect("move applies");

        let pending = match outcome {
            ClickOutcome::Submitted(pending) => pending,
            other => panic!("expected a submitted move, got {other:?}"),
        };
        assert_eq!(pending.player_move.to_string(), "e2e4");
        assert_eq!(pending.fen, state.to_fen());
        assert!(input.is_awaiting_engine());
        assert_eq!(input.selection(), None);
    }

    #[test]
    fn test_click_while_awaiting_engine_is_ignored() {
        let mut state = GameState::new();
        let mut input = InputState::Idle;
        input
            .submit("e2e4".parse().expect("valid move"), &mut state)
            .expect("move applies");
        // Pretend the engine answered but the reply was not processed yet.
        state.apply_move("e7e5").expect("engine move applies");
        let before = state.clone();

        let outcome = input.click(sq("d2"), &mut state).expect("no move attempted");

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(input.is_awaiting_engine());
        assert_eq!(state, before);
    }

    #[test]
    fn test_clicks_ignored_while_black_to_move() {
        let mut state = GameState::new();
        state.apply_move("e2e4").expect("move applies");
        let mut input = InputState::Idle;

        let outcome = input.click(sq("e7"), &mut state).expect("no move attempted");

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(input, InputState::Idle);
    }

    #[test]
    fn test_failed_submit_returns_to_idle() {
        let mut state = GameState::new();
        let mut input = InputState::Selected(sq("e4"));
        let before = state.clone();

        let result = input.click(sq("e5"), &mut state);

        assert_eq!(result, Err(MoveError::InvalidSourceSquare(sq("e4"))));
        assert_eq!(input, InputState::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let mut state = GameState::new();
        let mut input = InputState::Idle;
        input
            .submit("g1f3".parse().expect("valid move"), &mut state)
            .expect("move applies");

        input.finish();

        assert_eq!(input, InputState::Idle);
    }
}
