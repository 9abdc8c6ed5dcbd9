//! Mailbox board with reversible move application.

use chess_core::{Color, FenError, FenParser, Move, MoveKind, Piece, PieceType, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8x8 grid of optional pieces with a cached king position per color.
///
/// The cache is kept in step with the grid by [`Board::add_piece`] and
/// [`Board::remove_piece`]: placing a king records its square, removing the
/// king from its recorded square forgets it. Clearing a square with
/// `add_piece(pos, None)` does not touch the cache.
///
/// Serialized as its FEN piece placement, so loading a board rebuilds the cache.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    kings: [Option<Position>; 2],
}

/// Undo token for a single [`Board::apply_move`].
///
/// Records the moved piece (before any promotion), the captured piece and the
/// square it was actually taken from, which differs from the destination for
/// en passant. Hand it back to [`Board::unapply_move`] exactly once, in LIFO
/// order with respect to other applications on the same board.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an applied move must be unapplied or recorded"]
pub struct AppliedMove {
    mov: Move,
    piece: Piece,
    captured: Option<Piece>,
    captured_at: Position,
}

impl AppliedMove {
    /// The move that was applied.
    #[inline]
    pub fn mov(&self) -> &Move {
        &self.mov
    }

    /// The piece that moved, as it stood on the start square.
    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// The piece that was captured, if any.
    #[inline]
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// The square the captured piece was removed from.
    #[inline]
    pub fn captured_at(&self) -> Position {
        self.captured_at
    }

    /// Returns true if a pawn advanced two rows with this move.
    pub fn is_double_pawn_push(&self) -> bool {
        self.piece.kind == PieceType::Pawn
            && self.mov.start.row().abs_diff(self.mov.end.row()) == 2
    }
}

impl fmt::Display for AppliedMove {
    /// Short algebraic form without check markers: `Nf3`, `exd6`, `e8=Q`, `O-O`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let MoveKind::Castle { .. } = self.mov.kind {
            return if self.mov.end.col() > self.mov.start.col() {
                write!(f, "O-O")
            } else {
                write!(f, "O-O-O")
            };
        }
        if self.piece.kind != PieceType::Pawn {
            write!(f, "{}", self.piece.kind.to_char().to_ascii_uppercase())?;
        }
        if self.captured.is_some() {
            if self.piece.kind == PieceType::Pawn {
                write!(f, "{}", self.mov.start.file_char())?;
            }
            write!(f, "x")?;
        }
        write!(f, "{}", self.mov.end)?;
        if let Some(promotion) = self.mov.promotion {
            write!(f, "={}", promotion.to_char().to_ascii_uppercase())?;
        }
        Ok(())
    }
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            kings: [None; 2],
        }
    }

    /// Creates a board in the standard starting layout.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        board.reset();
        board
    }

    /// Puts every piece back on its starting square and clears the rest.
    pub fn reset(&mut self) {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        *self = Board::empty();
        for color in Color::ALL {
            for (i, kind) in BACK_RANK.iter().enumerate() {
                let col = i as u8 + 1;
                if let Some(pos) = Position::new(color.home_row(), col) {
                    self.add_piece(pos, Some(Piece::new(*kind, color)));
                }
                if let Some(pos) = Position::new(color.pawn_start_row(), col) {
                    self.add_piece(pos, Some(Piece::new(PieceType::Pawn, color)));
                }
            }
        }
    }

    /// Returns true if the raw coordinates lie on the board.
    #[inline]
    pub const fn in_bounds(row: i8, col: i8) -> bool {
        Position::in_bounds(row, col)
    }

    #[inline]
    fn cell(&self, pos: Position) -> &Option<Piece> {
        &self.squares[pos.row() as usize - 1][pos.col() as usize - 1]
    }

    #[inline]
    fn cell_mut(&mut self, pos: Position) -> &mut Option<Piece> {
        &mut self.squares[pos.row() as usize - 1][pos.col() as usize - 1]
    }

    /// Returns the piece on `pos`, if any.
    #[inline]
    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        *self.cell(pos)
    }

    /// Puts `piece` on `pos`, replacing whatever was there.
    ///
    /// `None` clears the square but leaves the king cache alone.
    pub fn add_piece(&mut self, pos: Position, piece: Option<Piece>) {
        *self.cell_mut(pos) = piece;
        if let Some(Piece {
            kind: PieceType::King,
            color,
        }) = piece
        {
            self.kings[color.index()] = Some(pos);
        }
    }

    /// Takes the piece off `pos` and returns it.
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        let piece = self.cell_mut(pos).take();
        if let Some(Piece {
            kind: PieceType::King,
            color,
        }) = piece
        {
            if self.kings[color.index()] == Some(pos) {
                self.kings[color.index()] = None;
            }
        }
        piece
    }

    /// Returns the cached square of `color`'s king.
    #[inline]
    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.kings[color.index()]
    }

    /// Iterates over every occupied square, row by row from row 1.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get_piece(pos).map(|piece| (pos, piece)))
    }

    /// Applies a single move and returns the token that undoes it.
    ///
    /// Takes the piece off the start square, removes whatever stands on the
    /// move's captured square (the destination, or the passed pawn for en
    /// passant) and drops the piece, or its promotion, on the destination.
    /// The rook half of a castle is a separate move. Returns `None` without
    /// touching the board when the start square is empty.
    pub fn apply_move(&mut self, m: &Move) -> Option<AppliedMove> {
        let piece = self.remove_piece(m.start)?;
        let captured_at = m.captured_square();
        let captured = self.remove_piece(captured_at);
        let placed = match m.promotion {
            Some(kind) => Piece::new(kind, piece.color),
            None => piece,
        };
        self.add_piece(m.end, Some(placed));
        Some(AppliedMove {
            mov: *m,
            piece,
            captured,
            captured_at,
        })
    }

    /// Reverts the application that produced `applied`.
    pub fn unapply_move(&mut self, applied: AppliedMove) {
        self.remove_piece(applied.mov.end);
        self.add_piece(applied.mov.start, Some(applied.piece));
        if applied.captured.is_some() {
            self.add_piece(applied.captured_at, applied.captured);
        }
    }

    /// Builds a board from the piece placement field of a FEN string.
    pub fn from_placement(placement: &str) -> Result<Self, FenError> {
        FenParser::validate_piece_placement(placement)?;

        let mut board = Board::empty();
        for (rank_idx, rank_str) in placement.split('/').enumerate() {
            let row = 8 - rank_idx as u8;
            let mut col = 1u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let pos = Position::new(row, col).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("square off the board in rank {}", row))
                    })?;
                    board.add_piece(pos, Some(piece));
                    col += 1;
                }
            }
        }
        Ok(board)
    }

    /// Returns the FEN piece placement for this board.
    pub fn to_placement(&self) -> String {
        let mut placement = String::with_capacity(72);
        for row in (1..=8u8).rev() {
            let mut empty = 0;
            for col in 1..=8u8 {
                match Position::new(row, col).and_then(|pos| self.get_piece(pos)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row > 1 {
                placement.push('/');
            }
        }
        placement
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl PartialEq for Board {
    /// Boards are equal when every square holds the same piece.
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_placement())
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_placement()
    }
}

impl TryFrom<String> for Board {
    type Error = FenError;

    fn try_from(placement: String) -> Result<Self, Self::Error> {
        Board::from_placement(&placement)
    }
}
