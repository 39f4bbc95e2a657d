use std::fmt;
use std::str::FromStr;

use shakmaty::{Color, Piece, Role};
use thiserror::Error;

/// Number of rows and columns on the board
pub const BOARD_SIZE: usize = 8;

const FILES: &[u8; BOARD_SIZE] = b"abcdefgh";

/// Error when parsing algebraic square notation such as `"e2"`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid square notation: '{0}'")]
pub struct ParseSquareError(pub String);

/// Grid coordinate (row 0 = rank 8, col 0 = file a)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    row: u8,
    col: u8,
}

impl Coordinate {
    /// Create a coordinate, or `None` if either component is off the board.
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub const fn col(self) -> usize {
        self.col as usize
    }

    /// All 64 coordinates, rank 8 first, file a first within each rank.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Coordinate::new(row, col)))
            .flatten()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(FILES[self.col()]),
            BOARD_SIZE - self.row()
        )
    }
}

impl FromStr for Coordinate {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSquareError(s.to_string());
        let &[file, rank] = s.as_bytes() else {
            return Err(err());
        };
        let col = FILES.iter().position(|&f| f == file).ok_or_else(err)?;
        let rank = match rank {
            b'1'..=b'8' => usize::from(rank - b'0'),
            _ => return Err(err()),
        };
        Coordinate::new(BOARD_SIZE - rank, col).ok_or_else(err)
    }
}

/// Map grid coordinates to algebraic notation (`(6, 4)` -> `"e2"`).
///
/// Returns `None` when the coordinates are off the board.
pub fn coordinate_to_square(row: usize, col: usize) -> Option<String> {
    Coordinate::new(row, col).map(|coord| coord.to_string())
}

/// Parse algebraic notation (one file letter, one rank digit) into grid coordinates.
pub fn square_to_coordinate(square: &str) -> Result<Coordinate, ParseSquareError> {
    square.parse()
}

/// Compact one-byte piece code: uppercase = White, lowercase = Black.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCode(u8);

impl PieceCode {
    /// Accepts only the twelve codes `PNBRQK` / `pnbrqk`.
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'P' | 'N' | 'B' | 'R' | 'Q' | 'K' | 'p' | 'n' | 'b' | 'r' | 'q' | 'k' => {
                Some(Self(ch as u8))
            }
            _ => None,
        }
    }

    #[inline]
    pub const fn char(self) -> char {
        self.0 as char
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub const fn role(self) -> Role {
        match self.0.to_ascii_lowercase() {
            b'p' => Role::Pawn,
            b'n' => Role::Knight,
            b'b' => Role::Bishop,
            b'r' => Role::Rook,
            b'q' => Role::Queen,
            _ => Role::King,
        }
    }

    #[inline]
    pub const fn is_pawn(self) -> bool {
        self.0.eq_ignore_ascii_case(&b'p')
    }

    /// Typed view of this code.
    #[inline]
    pub const fn piece(self) -> Piece {
        Piece {
            color: self.color(),
            role: self.role(),
        }
    }
}

impl From<Piece> for PieceCode {
    fn from(piece: Piece) -> Self {
        Self(piece.char() as u8)
    }
}

impl fmt::Debug for PieceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PieceCode({})", self.char())
    }
}

/// 8x8 grid of piece codes, row 0 = rank 8.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<PieceCode>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The standard chess starting arrangement.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for (row, rank) in [
            (0, "rnbqkbnr"),
            (1, "pppppppp"),
            (6, "PPPPPPPP"),
            (7, "RNBQKBNR"),
        ] {
            for (col, ch) in rank.chars().enumerate() {
                board.cells[row][col] = PieceCode::from_char(ch);
            }
        }
        board
    }

    #[inline]
    pub fn code_at(&self, coord: Coordinate) -> Option<PieceCode> {
        self.cells[coord.row()][coord.col()]
    }

    /// Get the piece at a given coordinate, if any
    #[inline]
    pub fn piece_at(&self, coord: Coordinate) -> Option<Piece> {
        self.code_at(coord).map(PieceCode::piece)
    }

    #[inline]
    pub fn is_empty_at(&self, coord: Coordinate) -> bool {
        self.code_at(coord).is_none()
    }

    /// Place (or clear, with `None`) a piece.
    #[inline]
    pub fn set(&mut self, coord: Coordinate, piece: Option<PieceCode>) {
        self.cells[coord.row()][coord.col()] = piece;
    }

    /// Rows in render order (rank 8 first).
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PieceCode>; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Number of kings of either color still on the board.
    pub fn king_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .filter(|code| code.role() == Role::King)
            .count()
    }

    /// FEN piece-placement field: ranks joined by `/`, empty runs as digits.
    pub fn placement(&self) -> String {
        let ranks: Vec<String> = self
            .cells
            .iter()
            .map(|row| {
                let mut out = String::new();
                let mut empty = 0;
                for cell in row {
                    match cell {
                        None => empty += 1,
                        Some(code) => {
                            if empty > 0 {
                                out.push_str(&empty.to_string());
                                empty = 0;
                            }
                            out.push(code.char());
                        }
                    }
                }
                if empty > 0 {
                    out.push_str(&empty.to_string());
                }
                out
            })
            .collect();
        ranks.join("/")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}
