//! Core types for the chess rules engine.
//!
//! This crate provides the value types shared by the engine and its callers:
//! - [`Piece`], [`PieceType`] and [`Color`] for piece representation
//! - [`Position`] for board coordinates (row and column, both 1-8)
//! - [`Move`] and [`MoveKind`] for move representation
//! - FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod position;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveKind};
pub use piece::{Piece, PieceType};
pub use position::Position;
