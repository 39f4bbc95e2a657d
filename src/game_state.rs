use std::fmt;

use log::{debug, warn};
use shakmaty::Color;
use thiserror::Error;

use crate::board::{Board, Coordinate};
use crate::uci::{ParseUciError, UciMove};

/// FEN of the standard starting position, as produced by [`GameState::to_fen`].
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling field written into every FEN. Rook and king history is not tracked.
const CASTLING_FIELD: &str = "KQkq";

/// En passant field written into every FEN. En passant targets are not tracked.
const EN_PASSANT_FIELD: &str = "-";

/// Reasons a move could not be applied. The state is untouched in every case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on source square {0}")]
    InvalidSourceSquare(Coordinate),

    #[error(transparent)]
    MalformedUci(#[from] ParseUciError),
}

/// Client-side board tracker.
///
/// Holds the grid, the side to move and the two FEN counters. Moves are
/// applied without any rule checking: the backend engine is the authority on
/// legality, and this type only mirrors what was played so the next FEN sent
/// matches what the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl GameState {
    /// Create a tracker at the standard starting position.
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Color::White,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Hard-reset to the starting position. Safe to call at any time.
    pub fn initialize(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Serialize the current state as FEN.
    ///
    /// Castling and en passant fields are fixed literals (`KQkq` and `-`).
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.board.placement(),
            self.side_to_move.char(),
            CASTLING_FIELD,
            EN_PASSANT_FIELD,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse and apply a UCI move string.
    pub fn apply_move(&mut self, uci: &str) -> Result<UciMove, MoveError> {
        let mv: UciMove = uci.parse()?;
        self.apply(mv)?;
        Ok(mv)
    }

    /// Apply an already parsed move.
    ///
    /// Any piece on `from` may go to any `to`. Castling does not move the rook,
    /// en passant does not remove the passed pawn, and pawns reaching the last
    /// rank stay pawns.
    pub fn apply(&mut self, mv: UciMove) -> Result<(), MoveError> {
        let Some(piece) = self.board.code_at(mv.from) else {
            warn!("apply_move: no piece at {} for {mv}", mv.from);
            return Err(MoveError::InvalidSourceSquare(mv.from));
        };

        if piece.is_pawn() || !self.board.is_empty_at(mv.to) {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }

        // Clear before placing so a same-square move keeps its piece.
        self.board.set(mv.from, None);
        self.board.set(mv.to, Some(piece));

        self.side_to_move = !self.side_to_move;

        debug!("applied {mv}: {}", self.to_fen());
        Ok(())
    }

    /// Fewer than two kings left on the board.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.board.king_count() < 2
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}
