//! Drives a [`Game`] through a list of UCI moves.

use crate::config::ReplayConfig;
use chess_core::{FenError, Move};
use chess_engine::{Game, GameStatus, InvalidMove};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Why a replay stopped before its last move.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// The starting FEN could not be loaded.
    #[error("invalid start position: {0}")]
    Start(#[from] FenError),
    /// A move is not in UCI notation. `index` counts from 1.
    #[error("move {index} ({text}) is not UCI notation")]
    Notation { index: usize, text: String },
    /// The engine refused a move. `index` counts from 1.
    #[error("move {index} ({text}) refused: {source}")]
    Refused {
        index: usize,
        text: String,
        #[source]
        source: InvalidMove,
    },
}

/// Result of a completed replay.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    /// Final position.
    pub fen: String,
    /// Status of the side to move in the final position.
    pub status: GameStatus,
    /// Moves accepted by the engine.
    pub played: usize,
    /// Moves left unplayed because the game ended first.
    pub skipped: usize,
    /// The game itself, in its persisted form.
    pub game: Game,
}

/// Returns true for the statuses that leave the side to move without a move.
fn is_decided(status: GameStatus) -> bool {
    matches!(status, GameStatus::Checkmate(_) | GameStatus::Stalemate(_))
}

/// Plays `config.moves` from `config.start` (or the standard start).
///
/// With `stop_on_end`, the game is ended as soon as the side to move is
/// checkmated or stalemated and the remaining moves are skipped.
pub fn replay(config: &ReplayConfig) -> Result<ReplaySummary, ReplayError> {
    let mut game = match config.start.as_deref() {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let mut status = game.status();
    if config.stop_on_end && is_decided(status) {
        info!(%status, "start position is already decided");
        game.end();
    }

    let mut played = 0;
    for (index, text) in config.moves.iter().enumerate() {
        if game.is_ended() {
            warn!(remaining = config.moves.len() - index, "game over, skipping remaining moves");
            break;
        }

        let m = Move::from_uci(text).ok_or_else(|| ReplayError::Notation {
            index: index + 1,
            text: text.clone(),
        })?;
        let mover = game.turn();
        game.make_move(m).map_err(|source| ReplayError::Refused {
            index: index + 1,
            text: text.clone(),
            source,
        })?;
        played += 1;

        status = game.status();
        info!(ply = game.ply(), mv = %m, color = %mover, %status, "move played");

        if config.stop_on_end && is_decided(status) {
            info!(%status, "game decided");
            game.end();
        }
    }

    Ok(ReplaySummary {
        fen: game.to_fen(),
        status,
        played,
        skipped: config.moves.len() - played,
        game,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn config(start: Option<&str>, moves: &[&str], stop_on_end: bool) -> ReplayConfig {
        ReplayConfig {
            start: start.map(str::to_string),
            moves: moves.iter().map(|m| m.to_string()).collect(),
            stop_on_end,
        }
    }

    #[test]
    fn test_replay_from_start() {
        let summary = replay(&config(None, &["e2e4", "e7e5", "g1f3"], true)).unwrap();
        assert_eq!(summary.played, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.status, GameStatus::InProgress);
        assert_eq!(
            summary.fen,
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 0 2"
        );
        assert!(!summary.game.is_ended());
    }

    #[test]
    fn test_checkmate_ends_game_and_skips_rest() {
        let moves = ["f2f3", "e7e5", "g2g4", "d8h4", "a2a3", "a7a6"];
        let summary = replay(&config(None, &moves, true)).unwrap();
        assert_eq!(summary.status, GameStatus::Checkmate(Color::White));
        assert_eq!(summary.played, 4);
        assert_eq!(summary.skipped, 2);
        assert!(summary.game.is_ended());
    }

    #[test]
    fn test_without_stop_on_end_moves_are_refused() {
        let moves = ["f2f3", "e7e5", "g2g4", "d8h4", "a2a3"];
        let err = replay(&config(None, &moves, false)).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Refused {
                index: 5,
                source: InvalidMove::IllegalMove(_),
                ..
            }
        ));
    }

    #[test]
    fn test_decided_start_position() {
        let stalemate = "7k/8/8/8/8/8/2q5/K7 w - - 0 1";
        let summary = replay(&config(Some(stalemate), &["a1b1"], true)).unwrap();
        assert_eq!(summary.status, GameStatus::Stalemate(Color::White));
        assert_eq!(summary.played, 0);
        assert_eq!(summary.skipped, 1);
        assert!(summary.game.is_ended());
    }

    #[test]
    fn test_bad_notation_reports_index() {
        let err = replay(&config(None, &["e2e4", "Nf6"], true)).unwrap_err();
        assert!(matches!(err, ReplayError::Notation { index: 2, .. }));
        assert_eq!(err.to_string(), "move 2 (Nf6) is not UCI notation");
    }

    #[test]
    fn test_wrong_turn_is_refused() {
        let err = replay(&config(None, &["e7e5"], true)).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Refused {
                source: InvalidMove::WrongTurn { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_bad_start_position() {
        let err = replay(&config(Some("8/8/8/8/8/8/8/4K3 w - - 0 1"), &[], true)).unwrap_err();
        assert!(matches!(err, ReplayError::Start(FenError::MissingKing(Color::Black))));
    }

    #[test]
    fn test_summary_serializes_with_game() {
        let summary = replay(&config(None, &["d2d4"], true)).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["played"], 1);
        assert_eq!(json["status"]["state"], "in_progress");
        let game: Game = serde_json::from_value(json["game"].clone()).unwrap();
        assert_eq!(game.to_fen(), summary.fen);
    }
}
