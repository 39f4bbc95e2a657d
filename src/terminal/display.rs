use std::io::{self, Write};

use shakmaty::{Color, Piece, Role};

use crate::BoardRenderer;
use crate::board::{BOARD_SIZE, Coordinate};
use crate::session::BoardView;

/// Terminal-based board renderer.
///
/// Draws the board as an 8×8 grid of Unicode pieces on alternating ANSI
/// light/dark backgrounds, with the selected square highlighted.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Create a new terminal renderer.
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal render operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardRenderer for TerminalRenderer {
    type Error = DisplayError;

    fn show(&mut self, view: &BoardView<'_>) -> Result<(), Self::Error> {
        render_board(&mut io::stdout(), view)
    }
}

const LIGHT: &str = "\x1b[47m";
const DARK: &str = "\x1b[100m";
const SELECTED: &str = "\x1b[42m";
const RESET: &str = "\x1b[0m";

/// Unicode glyph for a piece.
pub fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::Pawn) => '♙',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::King) => '♔',
        (Color::Black, Role::Pawn) => '♟',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::King) => '♚',
    }
}

/// Render a board view to any writer. Extracted for testability.
pub fn render_board(w: &mut impl Write, view: &BoardView<'_>) -> Result<(), DisplayError> {
    for (row, cells) in view.board.rows().enumerate() {
        write!(w, " {} ", BOARD_SIZE - row)?;
        for (col, cell) in cells.iter().enumerate() {
            let background = if view.selection == Coordinate::new(row, col) {
                SELECTED
            } else if (row + col) % 2 == 0 {
                LIGHT
            } else {
                DARK
            };
            let symbol = cell.map_or(' ', |code| glyph(code.piece()));
            write!(w, "{background} {symbol} {RESET}")?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    if view.awaiting_engine {
        writeln!(w, "Engine is thinking…")?;
    } else {
        let side = match view.side_to_move {
            Color::White => "White",
            Color::Black => "Black",
        };
        writeln!(w, "{side} to move")?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn render_to_string(view: &BoardView<'_>) -> String {
        let mut buf = Vec::new();
        render_board(&mut buf, view).expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    fn view(board: &Board) -> BoardView<'_> {
        BoardView {
            board,
            selection: None,
            side_to_move: Color::White,
            awaiting_engine: false,
        }
    }

    #[test]
    fn show_contains_all_ranks_and_files() {
        let board = Board::starting();
        let output = render_to_string(&view(&board));

        for rank in '1'..='8' {
            assert!(
                output.contains(rank),
                "output should contain rank label '{rank}'"
            );
        }
        assert!(output.contains("a  b  c  d  e  f  g  h"));
    }

    #[test]
    fn show_starting_pieces() {
        let board = Board::starting();
        let output = render_to_string(&view(&board));

        assert_eq!(output.matches('♙').count(), 8);
        assert_eq!(output.matches('♟').count(), 8);
        assert_eq!(output.matches('♔').count(), 1);
        assert_eq!(output.matches('♚').count(), 1);
        assert!(output.contains("White to move"));
    }

    #[test]
    fn show_selection_uses_green_background() {
        let board = Board::starting();
        let mut v = view(&board);
        assert!(!render_to_string(&v).contains(SELECTED));

        v.selection = Coordinate::new(6, 4);
        assert!(render_to_string(&v).contains(SELECTED));
    }

    #[test]
    fn show_thinking_indicator() {
        let board = Board::starting();
        let mut v = view(&board);
        v.awaiting_engine = true;
        v.side_to_move = Color::Black;

        let output = render_to_string(&v);

        assert!(output.contains("Engine is thinking"));
        assert!(!output.contains("Black to move"));
    }

    #[test]
    fn show_empty_board_has_no_pieces() {
        let board = Board::empty();
        let output = render_to_string(&view(&board));

        assert!(!output.chars().any(|c| ('♔'..='♟').contains(&c)));
    }
}
