use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::board::Coordinate;

/// A move string that is not a 4-character square pair.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed UCI move: '{0}'")]
pub struct ParseUciError(pub String);

/// UCI square pair (`e2e4`).
///
/// A promotion suffix (`e7e8q`) is accepted and dropped; the promoted pawn
/// stays a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Coordinate,
    pub to: Coordinate,
}

impl UciMove {
    #[inline]
    pub const fn new(from: Coordinate, to: Coordinate) -> Self {
        Self { from, to }
    }
}

impl FromStr for UciMove {
    type Err = ParseUciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseUciError(s.to_string());
        let squares = match s.as_bytes() {
            [_, _, _, _] => s,
            [_, _, _, _, b'q' | b'r' | b'b' | b'n'] => &s[..4],
            _ => return Err(err()),
        };
        if !squares.is_ascii() {
            return Err(err());
        }
        let (from, to) = squares.split_at(2);
        Ok(Self {
            from: from.parse().map_err(|_| err())?,
            to: to.parse().map_err(|_| err())?,
        })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
