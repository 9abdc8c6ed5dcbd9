//! Castling eligibility and en passant bookkeeping.

use crate::AppliedMove;
use chess_core::{Color, FenError, PieceType, Position};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tracks which kings and corner rooks have ever moved, and the en passant
/// target left by the previous ply.
///
/// "Moved" flags are permanent: a king or rook that returns to its square
/// does not regain the right to castle. The en passant target lives for one
/// ply only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    white_king_moved: bool,
    black_king_moved: bool,
    white_king_rook_moved: bool,
    white_queen_rook_moved: bool,
    black_king_rook_moved: bool,
    black_queen_rook_moved: bool,
    en_passant: Option<Position>,
}

impl MoveHistory {
    /// Fresh history: every castle available, no en passant target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from a FEN castling field ("KQkq", "Kq", "-").
    ///
    /// A missing right is recorded as its rook having moved.
    pub fn from_castling(castling: &str) -> Result<Self, FenError> {
        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(FenError::InvalidCastlingRights(castling.to_string()));
        }
        let has = |c: char| castling.contains(c);
        Ok(MoveHistory {
            white_king_rook_moved: !has('K'),
            white_queen_rook_moved: !has('Q'),
            black_king_rook_moved: !has('k'),
            black_queen_rook_moved: !has('q'),
            ..Self::default()
        })
    }

    /// Sets the en passant target, as read from a FEN en passant field.
    pub fn with_en_passant(mut self, target: Option<Position>) -> Self {
        self.en_passant = target;
        self
    }

    /// Returns the FEN castling field for the rights still held.
    pub fn castling_fen(&self) -> String {
        let mut field = String::with_capacity(4);
        if self.can_castle_king_side(Color::White) {
            field.push('K');
        }
        if self.can_castle_queen_side(Color::White) {
            field.push('Q');
        }
        if self.can_castle_king_side(Color::Black) {
            field.push('k');
        }
        if self.can_castle_queen_side(Color::Black) {
            field.push('q');
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }

    /// Records a committed move.
    ///
    /// Marks the king or corner rook as moved if it is the mover (or a corner
    /// rook if it is captured where it stands), and sets the en passant
    /// target behind a pawn that just double-stepped (clearing it otherwise).
    pub fn push_move(&mut self, applied: &AppliedMove) {
        let piece = applied.piece();
        let start = applied.mov().start;

        match piece.kind {
            PieceType::King => match piece.color {
                Color::White => self.white_king_moved = true,
                Color::Black => self.black_king_moved = true,
            },
            PieceType::Rook => self.mark_corner_rook(piece.color, start),
            _ => {}
        }
        // A rook taken on its corner can never castle either
        if let Some(captured) = applied.captured() {
            if captured.kind == PieceType::Rook {
                self.mark_corner_rook(captured.color, applied.captured_at());
            }
        }

        self.en_passant = if applied.is_double_pawn_push() {
            start.offset(piece.color.pawn_direction(), 0)
        } else {
            None
        };
        if let Some(target) = self.en_passant {
            trace!(%target, "en passant target set");
        }
    }

    fn mark_corner_rook(&mut self, color: Color, square: Position) {
        if square.row() != color.home_row() {
            return;
        }
        match (color, square.col()) {
            (Color::White, 1) => self.white_queen_rook_moved = true,
            (Color::White, 8) => self.white_king_rook_moved = true,
            (Color::Black, 1) => self.black_queen_rook_moved = true,
            (Color::Black, 8) => self.black_king_rook_moved = true,
            _ => {}
        }
    }

    /// True if neither `color`'s king nor its h-file rook has moved.
    pub fn can_castle_king_side(&self, color: Color) -> bool {
        match color {
            Color::White => !(self.white_king_moved || self.white_king_rook_moved),
            Color::Black => !(self.black_king_moved || self.black_king_rook_moved),
        }
    }

    /// True if neither `color`'s king nor its a-file rook has moved.
    pub fn can_castle_queen_side(&self, color: Color) -> bool {
        match color {
            Color::White => !(self.white_king_moved || self.white_queen_rook_moved),
            Color::Black => !(self.black_king_moved || self.black_queen_rook_moved),
        }
    }

    /// The square a pawn may capture onto en passant this ply, if any.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use chess_core::Move;

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    /// Applies `m` to `board` and records it.
    fn play(board: &mut Board, history: &mut MoveHistory, m: Move) {
        let applied = board.apply_move(&m).unwrap();
        history.push_move(&applied);
    }

    #[test]
    fn fresh_history_allows_everything() {
        let history = MoveHistory::new();
        for color in Color::ALL {
            assert!(history.can_castle_king_side(color));
            assert!(history.can_castle_queen_side(color));
        }
        assert_eq!(history.en_passant_target(), None);
        assert_eq!(history.castling_fen(), "KQkq");
    }

    #[test]
    fn king_move_removes_both_sides() {
        let mut board = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let mut history = MoveHistory::new();

        play(&mut board, &mut history, Move::new(sq("e1"), sq("e2")));
        play(&mut board, &mut history, Move::new(sq("e2"), sq("e1")));

        assert!(!history.can_castle_king_side(Color::White));
        assert!(!history.can_castle_queen_side(Color::White));
        assert!(history.can_castle_king_side(Color::Black));
        assert_eq!(history.castling_fen(), "kq");
    }

    #[test]
    fn rook_move_removes_its_side_only() {
        let mut board = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let mut history = MoveHistory::new();

        play(&mut board, &mut history, Move::new(sq("a8"), sq("b8")));
        assert!(!history.can_castle_queen_side(Color::Black));
        assert!(history.can_castle_king_side(Color::Black));

        play(&mut board, &mut history, Move::new(sq("h1"), sq("h5")));
        assert!(!history.can_castle_king_side(Color::White));
        assert!(history.can_castle_queen_side(Color::White));
        assert_eq!(history.castling_fen(), "Qk");
    }

    #[test]
    fn captured_corner_rook_loses_its_side() {
        let mut board = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let mut history = MoveHistory::new();

        play(&mut board, &mut history, Move::new(sq("a1"), sq("a8")));
        assert!(!history.can_castle_queen_side(Color::Black));
        assert!(!history.can_castle_queen_side(Color::White));
        assert!(history.can_castle_king_side(Color::Black));
    }

    #[test]
    fn double_push_sets_target_for_one_ply() {
        let mut board = Board::starting();
        let mut history = MoveHistory::new();

        play(&mut board, &mut history, Move::new(sq("d7"), sq("d5")));
        assert_eq!(history.en_passant_target(), Some(sq("d6")));

        play(&mut board, &mut history, Move::new(sq("g1"), sq("f3")));
        assert_eq!(history.en_passant_target(), None);

        play(&mut board, &mut history, Move::new(sq("e2"), sq("e4")));
        assert_eq!(history.en_passant_target(), Some(sq("e3")));

        play(&mut board, &mut history, Move::new(sq("e7"), sq("e6")));
        assert_eq!(history.en_passant_target(), None);
    }

    #[test]
    fn from_castling_field() {
        let history = MoveHistory::from_castling("Kq").unwrap();
        assert!(history.can_castle_king_side(Color::White));
        assert!(!history.can_castle_queen_side(Color::White));
        assert!(!history.can_castle_king_side(Color::Black));
        assert!(history.can_castle_queen_side(Color::Black));
        assert_eq!(history.castling_fen(), "Kq");

        assert_eq!(MoveHistory::from_castling("-").unwrap().castling_fen(), "-");
        assert!(MoveHistory::from_castling("X").is_err());
    }
}
