//! Pseudo-legal move generation.
//!
//! Every function here is a pure read of a [`Board`]. None of them know
//! whether a move exposes the mover's king; [`Game`](crate::Game) filters for
//! that by applying each candidate and asking whether the king is attacked.

pub mod perft;

use crate::Board;
use chess_core::{Color, Move, Piece, PieceType, Position};

/// Orthogonal ray directions as (row, column) steps.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Diagonal ray directions as (row, column) steps.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

/// All eight ray directions.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Longest ray on an 8x8 board.
const MAX_RAY: u8 = 7;

/// Which rook a king castles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// Column of the rook this side castles with.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::KingSide => 8,
            CastleSide::QueenSide => 1,
        }
    }
}

/// A castling move whose path is clear, pending the attack checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastleCandidate {
    /// The king's two-file move, carrying the rook relocation.
    pub king_move: Move,
    /// Squares the king crosses and lands on, in order. None may be attacked.
    pub transit: Vec<Position>,
}

/// Generates pseudo-legal moves for whatever piece stands on `from`.
///
/// Castling and en passant are not included: they depend on move history.
/// Returns an empty list for an empty square.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<Move> {
    let mut moves = Vec::new();
    let Some(piece) = board.get_piece(from) else {
        return moves;
    };

    let color = piece.color;
    match piece.kind {
        PieceType::Bishop => {
            sliding_moves(board, from, color, &BISHOP_DIRECTIONS, MAX_RAY, &mut moves)
        }
        PieceType::Rook => sliding_moves(board, from, color, &ROOK_DIRECTIONS, MAX_RAY, &mut moves),
        PieceType::Queen => {
            sliding_moves(board, from, color, &QUEEN_DIRECTIONS, MAX_RAY, &mut moves)
        }
        PieceType::King => king_moves(board, from, piece.color, &mut moves),
        PieceType::Knight => knight_moves(board, from, piece.color, &mut moves),
        PieceType::Pawn => pawn_moves(board, from, piece.color, &mut moves),
    }

    moves
}

/// Walks each ray outward from `from` for up to `max_distance` squares.
///
/// A ray stops at the board edge, stops before a friendly piece, and stops
/// after an enemy piece (the capture is included).
pub fn sliding_moves(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    max_distance: u8,
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        for _ in 0..max_distance {
            let Some(to) = current.offset(dr, dc) else {
                break;
            };
            match board.get_piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(occupant) => {
                    if occupant.color != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// One step in every direction, castling excluded.
pub fn king_moves(board: &Board, from: Position, color: Color, moves: &mut Vec<Move>) {
    sliding_moves(board, from, color, &QUEEN_DIRECTIONS, 1, moves);
}

/// The eight knight jumps that land on the board and not on a friendly piece.
pub fn knight_moves(board: &Board, from: Position, color: Color, moves: &mut Vec<Move>) {
    for &(dr, dc) in &KNIGHT_OFFSETS {
        if let Some(to) = from.offset(dr, dc) {
            if board.get_piece(to).map_or(true, |p| p.color != color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

/// Pawn pushes and diagonal captures, expanded into promotions on the far rank.
pub fn pawn_moves(board: &Board, from: Position, color: Color, moves: &mut Vec<Move>) {
    let dir = color.pawn_direction();

    if let Some(one) = from.offset(dir, 0) {
        if board.get_piece(one).is_none() {
            push_pawn_move(from, one, color, moves);

            if from.row() == color.pawn_start_row() {
                if let Some(two) = from.offset(2 * dir, 0) {
                    if board.get_piece(two).is_none() {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            if matches!(board.get_piece(to), Some(p) if p.color != color) {
                push_pawn_move(from, to, color, moves);
            }
        }
    }
}

fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut Vec<Move>) {
    if to.row() == color.promotion_row() {
        for kind in PieceType::PROMOTIONS {
            moves.push(Move::promote(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

/// Returns the en passant capture available to the pawn on `from`, if any.
///
/// `target` is the square behind a pawn that double-stepped on the previous
/// ply. The capturing pawn must stand beside that pawn on its fifth rank.
pub fn en_passant_move(
    board: &Board,
    from: Position,
    color: Color,
    target: Option<Position>,
) -> Option<Move> {
    let target = target?;
    let (pawn_row, target_row) = match color {
        Color::White => (5, 6),
        Color::Black => (4, 3),
    };
    if from.row() != pawn_row
        || target.row() != target_row
        || from.col().abs_diff(target.col()) != 1
    {
        return None;
    }

    let captured = Position::new(from.row(), target.col())?;
    let passed_pawn = Piece::new(PieceType::Pawn, color.opposite());
    if board.get_piece(captured) != Some(passed_pawn) || board.get_piece(target).is_some() {
        return None;
    }

    Some(Move::en_passant(from, target, captured))
}

/// Builds the castle on `side` for the king on `king_at`, if its path is clear.
///
/// Requires the king on its home square, the matching rook on its corner and
/// every square between them empty. History and attack checks are left to
/// the caller.
pub fn castle_candidate(
    board: &Board,
    king_at: Position,
    color: Color,
    side: CastleSide,
) -> Option<CastleCandidate> {
    let row = color.home_row();
    let home = Position::new(row, 5)?;
    if king_at != home || board.get_piece(home) != Some(Piece::new(PieceType::King, color)) {
        return None;
    }

    let rook_start = Position::new(row, side.rook_col())?;
    if board.get_piece(rook_start) != Some(Piece::new(PieceType::Rook, color)) {
        return None;
    }

    let (low, high) = match side {
        CastleSide::KingSide => (6, 7),
        CastleSide::QueenSide => (2, 4),
    };
    for col in low..=high {
        if board.get_piece(Position::new(row, col)?).is_some() {
            return None;
        }
    }

    let (crossed, landing) = match side {
        CastleSide::KingSide => (Position::new(row, 6)?, Position::new(row, 7)?),
        CastleSide::QueenSide => (Position::new(row, 4)?, Position::new(row, 3)?),
    };
    Some(CastleCandidate {
        king_move: Move::castle(home, landing, rook_start, crossed),
        transit: vec![crossed, landing],
    })
}

/// Returns true if any piece of `by` has a pseudo-legal move landing on `target`.
///
/// Meant for occupied targets such as a king's square: on an empty square a
/// pawn push would count. Promotion variants of a pawn capture all land on
/// the same square, so they count as attacks too.
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == by)
        .any(|(from, _)| pseudo_legal_moves(board, from).iter().any(|m| m.end == target))
}
