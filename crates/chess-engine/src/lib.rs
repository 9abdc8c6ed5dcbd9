//! Chess rules engine on an 8x8 square array.
//!
//! This crate provides:
//! - [`Board`] - piece placement with apply/undo of single moves
//! - [`MoveHistory`] - castling eligibility and the en passant target
//! - [`Game`] - turn order, legality filtering, check/checkmate/stalemate queries
//! - [`movegen`] - pseudo-legal move generation and attack detection
//!
//! # Architecture
//!
//! Move generation works per piece: each piece kind walks its rays or
//! offsets from its square and stops at the edge, at a friendly piece, or
//! on the first enemy piece (a capture). Legality is then decided by
//! applying the candidate, checking whether the mover's king is attacked,
//! and undoing the application.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, GameStatus, Move};
//!
//! let mut game = Game::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.make_move(Move::from_uci(uci).unwrap()).unwrap();
//! }
//! assert_eq!(game.status(), GameStatus::Checkmate(chess_engine::Color::White));
//! println!("Final position: {}", game.to_fen());
//! ```

mod board;
mod game;
mod history;
pub mod movegen;

pub use board::{AppliedMove, Board};
pub use chess_core::{Color, FenError, Move, MoveKind, Piece, PieceType, Position};
pub use game::{Game, GameStatus, InvalidMove};
pub use history::MoveHistory;
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{CastleCandidate, CastleSide};
