//! Board coordinate representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the board, addressed by row (rank, 1-8) and column (file, 1-8).
///
/// Row 1 is White's back rank and column 1 is the a-file, so `e2` is
/// `Position { row: 2, col: 5 }`. A `Position` is always in bounds: the
/// constructors refuse coordinates outside 1-8.
///
/// Serialized as its algebraic name (`"e2"`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, or `None` if either coordinate is outside 1-8.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if Self::in_bounds(row as i8, col as i8) {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Returns true if both coordinates are in 1-8.
    #[inline]
    pub const fn in_bounds(row: i8, col: i8) -> bool {
        row >= 1 && row <= 8 && col >= 1 && col <= 8
    }

    /// Returns the row (rank), 1-8.
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (file), 1-8.
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the position `dr` rows and `dc` columns away, if it is on the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        // Widened so extreme steps cannot overflow
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if row >= 1 && row <= 8 && col >= 1 && col <= 8 {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Parses a position from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&bytes[1]) {
            return None;
        }
        Position::new(bytes[1] - b'0', file - b'a' + 1)
    }

    /// Returns the algebraic notation for this position.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.row)
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col - 1) as char
    }

    /// Iterates over all 64 positions, row by row from row 1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Position { row, col }))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_algebraic())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.to_algebraic()
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Position::from_algebraic(&s).ok_or_else(|| format!("invalid square '{}'", s))
    }
}
