//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator,
//! including castling, en passant, promotion and check evasion.

use crate::Game;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut game = game.clone();
    let moves = game.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in moves {
        let mut next = game.clone();
        let played = next.make_move(m);
        debug_assert!(played.is_ok(), "legal move {m} refused: {played:?}");
        if played.is_ok() {
            nodes += perft(&next, depth - 1);
        }
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(game: &Game, depth: u32) -> Vec<(String, u64)> {
    let mut game = game.clone();
    let moves = game.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in moves {
        let mut next = game.clone();
        let played = next.make_move(m);
        debug_assert!(played.is_ok(), "legal move {m} refused: {played:?}");
        if played.is_err() {
            continue;
        }
        let nodes = if depth > 1 {
            perft(&next, depth - 1)
        } else {
            1
        };
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    // Starting position perft values (well-known and verified)
    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&Game::new(), 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&Game::new(), 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&Game::new(), 3), 8902);
    }

    // Depth 4 rescans the board for every candidate, only run on request
    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&Game::new(), 4), 197281);
    }

    // Kiwipete - a position with lots of special moves
    #[test]
    fn perft_kiwipete_depth_1() {
        let game = Game::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&game, 1), 48);
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        let game = Game::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&game, 2), 2039);
    }

    // Position 3: Check evasion, en passant, promotion
    #[test]
    fn perft_position3_depth_1() {
        let game = Game::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&game, 1), 14);
    }

    #[test]
    fn perft_position3_depth_3() {
        let game = Game::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&game, 3), 2812);
    }

    // Position 4: Lots of promotions and captures
    #[test]
    fn perft_position4_depth_1() {
        let game = Game::from_fen(POSITION_4).unwrap();
        assert_eq!(perft(&game, 1), 6);
    }

    #[test]
    fn perft_position4_depth_2() {
        let game = Game::from_fen(POSITION_4).unwrap();
        assert_eq!(perft(&game, 2), 264);
    }

    // Position 5: Complex position
    #[test]
    fn perft_position5_depth_1() {
        let game = Game::from_fen(POSITION_5).unwrap();
        assert_eq!(perft(&game, 1), 44);
    }

    #[test]
    fn perft_position5_depth_2() {
        let game = Game::from_fen(POSITION_5).unwrap();
        assert_eq!(perft(&game, 2), 1486);
    }

    #[test]
    fn perft_divide_works() {
        let results = perft_divide(&Game::new(), 1);
        assert_eq!(results.len(), 20);
        // Total should equal perft(1)
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 20);
        assert_eq!(results[0].0, "a2a3");
    }

    #[test]
    fn perft_divide_covers_every_legal_move() {
        let mut game = Game::from_fen(KIWIPETE).unwrap();
        let legal = game.legal_moves().len();

        let shallow = perft_divide(&game, 1);
        assert_eq!(legal, 48);
        assert_eq!(shallow.len(), legal);

        let deep = perft_divide(&game, 2);
        assert_eq!(deep.len(), legal);
        let total: u64 = deep.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 2039);
    }
}
