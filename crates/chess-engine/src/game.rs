//! Game orchestration: legality, move application, and end-of-game queries.
//!
//! [`Game`] owns one [`Board`] and one [`MoveHistory`]. Legality is decided by
//! applying each pseudo-legal candidate to the board, asking whether the
//! mover's king is attacked, and undoing the application. Queries therefore
//! take `&mut self` even though they leave the game exactly as they found it.

use crate::movegen::{self, CastleSide};
use crate::{Board, MoveHistory};
use chess_core::{Color, FenError, FenParser, Move, Piece, PieceType, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Why a move was refused. The game is never modified when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMove {
    /// The start square is empty.
    #[error("no piece at {0}")]
    NoPiece(Position),
    /// The piece on the start square belongs to the player not on turn.
    #[error("{piece} on {at} cannot move: it is {turn}'s turn")]
    WrongTurn {
        at: Position,
        piece: Piece,
        turn: Color,
    },
    /// The move is not among the piece's legal moves.
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    /// The game has been marked as ended.
    #[error("game has already ended")]
    GameOver,
}

/// Outcome of the end-of-game queries for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "color", rename_all = "snake_case")]
pub enum GameStatus {
    /// Nothing to report.
    InProgress,
    /// The given side is in check but has a way out.
    Check(Color),
    /// The given side is in check with no legal move.
    Checkmate(Color),
    /// The given side is not in check and has no legal move.
    Stalemate(Color),
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Check(color) => write!(f, "{color} is in check"),
            GameStatus::Checkmate(color) => write!(f, "{color} is checkmated"),
            GameStatus::Stalemate(color) => write!(f, "stalemate, {color} to move"),
        }
    }
}

/// A chess game: board, side to move, castling/en passant bookkeeping and
/// an end flag.
///
/// Checkmate and stalemate are queries. Nothing in the engine ends the game
/// on its own; the caller decides when to call [`Game::end`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    history: MoveHistory,
    #[serde(default)]
    ended: bool,
    #[serde(default)]
    ply: u64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position, White to move.
    pub fn new() -> Self {
        Game {
            board: Board::starting(),
            turn: Color::White,
            history: MoveHistory::new(),
            ended: false,
            ply: 0,
        }
    }

    /// Creates a game from a FEN string.
    ///
    /// Castling rights and the en passant target are taken from the FEN.
    /// The halfmove clock is ignored.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let board = Board::from_placement(&parsed.piece_placement)?;
        for color in Color::ALL {
            if board.king_position(color).is_none() {
                return Err(FenError::MissingKing(color));
            }
        }
        let history =
            MoveHistory::from_castling(&parsed.castling)?.with_en_passant(parsed.en_passant);
        let ply = u64::from(parsed.fullmove_number.saturating_sub(1)) * 2
            + u64::from(parsed.active_color == Color::Black);

        Ok(Game {
            board,
            turn: parsed.active_color,
            history,
            ended: false,
            ply,
        })
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        FenParser {
            piece_placement: self.board.to_placement(),
            active_color: self.turn,
            castling: self.history.castling_fen(),
            en_passant: self.history.en_passant_target(),
            halfmove_clock: 0,
            fullmove_number: u32::try_from(self.ply / 2 + 1).unwrap_or(u32::MAX),
        }
        .to_fen()
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the board and resets castling and en passant bookkeeping.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.history = MoveHistory::new();
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Sets the side to move.
    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    /// Returns the castling and en passant bookkeeping.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Number of moves accepted so far (plus the offset of a FEN start).
    pub fn ply(&self) -> u64 {
        self.ply
    }

    /// Marks the game as ended. Further moves are refused.
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Returns true once [`Game::end`] has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns the legal moves of the piece on `pos`, or `None` if the square is empty.
    ///
    /// Includes en passant and castling where the history allows them. The
    /// piece's owner does not have to be on turn.
    pub fn valid_moves(&mut self, pos: Position) -> Option<HashSet<Move>> {
        let piece = self.board.get_piece(pos)?;
        let color = piece.color;

        let mut candidates = movegen::pseudo_legal_moves(&self.board, pos);
        if piece.kind == PieceType::Pawn {
            let target = self.history.en_passant_target();
            if let Some(ep) = movegen::en_passant_move(&self.board, pos, color, target) {
                candidates.push(ep);
            }
        }

        let mut moves: HashSet<Move> = candidates
            .into_iter()
            .filter(|m| self.leaves_king_safe(m, color))
            .collect();

        if piece.kind == PieceType::King && !self.is_in_check(color) {
            for side in CastleSide::ALL {
                if let Some(castle) = self.legal_castle(pos, color, side) {
                    moves.insert(castle);
                }
            }
        }

        Some(moves)
    }

    /// Returns every legal move of the side to move, ordered by UCI text.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let owned = self.squares_of(self.turn);
        let mut moves: Vec<Move> = owned
            .into_iter()
            .filter_map(|pos| self.valid_moves(pos))
            .flatten()
            .collect();
        moves.sort_by_key(|m| m.to_uci());
        moves
    }

    /// Plays `m` for the side to move.
    ///
    /// The move is matched against the piece's legal moves by start, end and
    /// promotion, so a plain `e1g1` castles and a plain diagonal pawn move onto
    /// the en passant target captures en passant. Every check happens before
    /// the board is touched.
    pub fn make_move(&mut self, m: Move) -> Result<(), InvalidMove> {
        let legal = match self.validate(&m) {
            Ok(legal) => legal,
            Err(err) => {
                debug!(mv = %m, reason = %err, "move rejected");
                return Err(err);
            }
        };

        let applied = self
            .board
            .apply_move(&legal)
            .ok_or(InvalidMove::NoPiece(legal.start))?;
        if let Some(rook_move) = legal.castle_rook_move() {
            if let Some(rook) = self.board.apply_move(&rook_move) {
                self.history.push_move(&rook);
            }
        }
        self.history.push_move(&applied);
        trace!(mv = %applied, color = %self.turn, ply = self.ply, "move played");

        self.turn = self.turn.opposite();
        self.ply = self.ply.saturating_add(1);
        Ok(())
    }

    fn validate(&mut self, m: &Move) -> Result<Move, InvalidMove> {
        if self.ended {
            return Err(InvalidMove::GameOver);
        }
        let piece = self
            .board
            .get_piece(m.start)
            .ok_or(InvalidMove::NoPiece(m.start))?;
        if piece.color != self.turn {
            return Err(InvalidMove::WrongTurn {
                at: m.start,
                piece,
                turn: self.turn,
            });
        }
        self.valid_moves(m.start)
            .and_then(|moves| moves.into_iter().find(|legal| legal.same_action(m)))
            .ok_or(InvalidMove::IllegalMove(*m))
    }

    /// Returns true if `color`'s king is attacked by any opposing piece.
    ///
    /// A board without a king of `color` is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.board.king_position(color) {
            Some(king) => movegen::is_square_attacked(&self.board, king, color.opposite()),
            None => false,
        }
    }

    /// Returns true if `color` is in check and has no legal move.
    pub fn is_in_checkmate(&mut self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Returns true if `color` is not in check and has no legal move.
    pub fn is_in_stalemate(&mut self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Runs the end-of-game queries for the side to move.
    pub fn status(&mut self) -> GameStatus {
        let color = self.turn;
        let in_check = self.is_in_check(color);
        match (in_check, self.has_legal_move(color)) {
            (true, false) => GameStatus::Checkmate(color),
            (false, false) => GameStatus::Stalemate(color),
            (true, true) => GameStatus::Check(color),
            (false, true) => GameStatus::InProgress,
        }
    }

    fn has_legal_move(&mut self, color: Color) -> bool {
        self.squares_of(color)
            .into_iter()
            .any(|pos| self.valid_moves(pos).is_some_and(|moves| !moves.is_empty()))
    }

    fn squares_of(&self, color: Color) -> Vec<Position> {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color == color)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Applies `m`, checks whether `color`'s king is attacked, and undoes it.
    fn leaves_king_safe(&mut self, m: &Move, color: Color) -> bool {
        let Some(applied) = self.board.apply_move(m) else {
            return false;
        };
        let safe = !self.is_in_check(color);
        self.board.unapply_move(applied);
        safe
    }

    /// Returns the castle on `side` if the history allows it, the path is
    /// clear and the king is attacked on none of the squares it moves through.
    fn legal_castle(
        &mut self,
        king_at: Position,
        color: Color,
        side: CastleSide,
    ) -> Option<Move> {
        let allowed = match side {
            CastleSide::KingSide => self.history.can_castle_king_side(color),
            CastleSide::QueenSide => self.history.can_castle_queen_side(color),
        };
        if !allowed {
            return None;
        }

        let candidate = movegen::castle_candidate(&self.board, king_at, color, side)?;
        let safe = candidate
            .transit
            .iter()
            .all(|&square| self.leaves_king_safe(&Move::new(king_at, square), color));
        safe.then_some(candidate.king_move)
    }
}
