//! Move representation.

use crate::{PieceType, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a move does beyond lifting a piece from `start` and dropping it on `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveKind {
    /// Ordinary move or capture on the destination square (promotions included).
    Normal,
    /// Pawn capture en passant. The captured pawn stands on `captured`, not on the destination.
    EnPassant { captured: Position },
    /// King move of two files. The rook on `rook_start` is relocated to `rook_end`.
    Castle {
        rook_start: Position,
        rook_end: Position,
    },
}

/// A chess move.
///
/// `promotion` is set only for pawn moves onto the far rank. Generated moves
/// carry the right [`MoveKind`]; moves built from caller input are `Normal`
/// and are matched against generated moves with [`Move::same_action`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
    #[serde(default = "normal_kind")]
    pub kind: MoveKind,
}

fn normal_kind() -> MoveKind {
    MoveKind::Normal
}

impl Move {
    /// Creates a normal move.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Move {
            start,
            end,
            promotion: None,
            kind: MoveKind::Normal,
        }
    }

    /// Creates a pawn move that promotes to `piece` on arrival.
    #[inline]
    pub const fn promote(start: Position, end: Position, piece: PieceType) -> Self {
        Move {
            start,
            end,
            promotion: Some(piece),
            kind: MoveKind::Normal,
        }
    }

    /// Creates an en passant capture of the pawn standing on `captured`.
    #[inline]
    pub const fn en_passant(start: Position, end: Position, captured: Position) -> Self {
        Move {
            start,
            end,
            promotion: None,
            kind: MoveKind::EnPassant { captured },
        }
    }

    /// Creates a castling king move together with its rook relocation.
    #[inline]
    pub const fn castle(
        start: Position,
        end: Position,
        rook_start: Position,
        rook_end: Position,
    ) -> Self {
        Move {
            start,
            end,
            promotion: None,
            kind: MoveKind::Castle {
                rook_start,
                rook_end,
            },
        }
    }

    /// Returns the square whose occupant this move captures.
    ///
    /// This is the destination for every move except en passant.
    #[inline]
    pub const fn captured_square(&self) -> Position {
        match self.kind {
            MoveKind::EnPassant { captured } => captured,
            MoveKind::Normal | MoveKind::Castle { .. } => self.end,
        }
    }

    /// Returns true if both moves lift from the same square, land on the same
    /// square and promote to the same piece, whatever their kind.
    #[inline]
    pub fn same_action(&self, other: &Move) -> bool {
        self.start == other.start && self.end == other.end && self.promotion == other.promotion
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant { .. })
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }

    /// Returns the rook half of a castle, or `None` for any other move.
    #[inline]
    pub const fn castle_rook_move(&self) -> Option<Move> {
        match self.kind {
            MoveKind::Castle {
                rook_start,
                rook_end,
            } => Some(Move::new(rook_start, rook_end)),
            MoveKind::Normal | MoveKind::EnPassant { .. } => None,
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(piece) => format!("{}{}{}", self.start, self.end, piece.to_char()),
            None => format!("{}{}", self.start, self.end),
        }
    }

    /// Parses a move from UCI notation.
    ///
    /// The result is always [`MoveKind::Normal`]; the engine resolves the
    /// real kind against its generated moves.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let start = Position::from_algebraic(&s[0..2])?;
        let end = Position::from_algebraic(&s[2..4])?;
        if start == end {
            return None;
        }
        match s[4..].chars().next() {
            Some(c) => {
                let piece = PieceType::from_char(c).filter(|p| p.is_promotion_target())?;
                Some(Move::promote(start, end, piece))
            }
            None => Some(Move::new(start, end)),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::Normal => write!(f, "Move({})", self.to_uci()),
            MoveKind::EnPassant { captured } => {
                write!(f, "Move({} ep x{})", self.to_uci(), captured)
            }
            MoveKind::Castle { .. } => write!(f, "Move({} castle)", self.to_uci()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
