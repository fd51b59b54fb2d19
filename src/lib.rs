pub mod board;
pub mod config;
pub mod console;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod search;
pub mod transposition;

pub use board::{Board, Color, GameStatus, Move, Piece, Square};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use evaluation::{Evaluator, Score, MATE_SCORE};
pub use game::Game;
pub use search::{Search, SearchResult};

/// Standard starting position, white to move.
pub fn new_game() -> Board {
    Board::new()
}

/// Legal destinations for the piece on `square`; empty for an empty square.
pub fn legal_moves(board: &Board, square: Square) -> Result<Vec<Square>> {
    board.possible_moves(square)
}

/// Applies a move without validating it. The caller advances the turn.
pub fn apply_move(board: &mut Board, from: Square, to: Square) {
    board.make_move(from, to);
}

pub fn is_in_check(board: &Board, color: Color) -> Result<bool> {
    board.is_in_check(color)
}

pub fn is_checkmate(board: &Board, color: Color) -> Result<bool> {
    board.is_checkmate(color)
}

/// One-off search with a fresh cache. A score of `MATE_SCORE` or
/// `-MATE_SCORE` means a forced mate for white or black.
pub fn best_move(board: &Board, depth: u32, threat: bool, defense: bool) -> Result<SearchResult> {
    let evaluator = Evaluator {
        threat,
        defense,
        ..Evaluator::default()
    };
    Search::with_evaluator(evaluator).find_best_move(board, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_position() {
        let board = new_game();
        let moves = board.legal_moves(Color::White).unwrap();

        // White should have 20 legal moves in the initial position
        assert_eq!(moves.len(), 20);
        assert_eq!(board.legal_moves(Color::Black).unwrap().len(), 20);
        assert!(!is_in_check(&board, Color::White).unwrap());
    }

    #[test]
    fn test_random_playouts_stay_legal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..8 {
            let mut board = new_game();
            for _ in 0..60 {
                let side = board.side_to_move();
                let moves = board.legal_moves(side).unwrap();
                for mv in &moves {
                    assert!(board.piece_at(mv.from).is_some());
                    if let Some((_, owner)) = board.piece_at(mv.to) {
                        assert_ne!(owner, side);
                    }
                    let mut after = board.clone();
                    apply_move(&mut after, mv.from, mv.to);
                    assert!(!is_in_check(&after, side).unwrap());
                }
                let mv = match moves.choose(&mut rng) {
                    Some(mv) => *mv,
                    None => break,
                };
                apply_move(&mut board, mv.from, mv.to);
                board.advance_turn();
            }
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let board = new_game();
        let mut copy = board.clone();
        apply_move(&mut copy, sq("e2"), sq("e4"));
        assert_eq!(board, new_game());
        assert_ne!(board, copy);
        assert!(!board.has_moved(sq("e2")));
    }

    #[test]
    fn test_pawn_moves() {
        let mut board = new_game();
        assert_eq!(legal_moves(&board, sq("d2")).unwrap(), vec![sq("d3"), sq("d4")]);

        apply_move(&mut board, sq("d2"), sq("d4"));
        apply_move(&mut board, sq("e7"), sq("e5"));
        assert_eq!(legal_moves(&board, sq("d4")).unwrap(), vec![sq("d5"), sq("e5")]);
    }

    #[test]
    fn test_castling() {
        let mut board = new_game();
        board.set_piece(sq("f1"), None);
        board.set_piece(sq("g1"), None);
        assert!(legal_moves(&board, sq("e1")).unwrap().contains(&sq("g1")));

        apply_move(&mut board, sq("e1"), sq("g1"));
        assert_eq!(board.piece_at(sq("g1")), Some((Piece::King, Color::White)));
        assert_eq!(board.piece_at(sq("f1")), Some((Piece::Rook, Color::White)));
        assert_eq!(board.piece_at(sq("h1")), None);
        assert_eq!(board.piece_at(sq("e1")), None);
        assert!(board.has_moved(sq("e1")));
        assert!(board.has_moved(sq("h1")));
    }

    #[test]
    fn test_queenside_castling() {
        let mut board = Board::from_diagram(
            "r...k...
             ........
             ........
             ........
             ........
             ........
             ........
             ....K...",
        )
        .unwrap();
        board.advance_turn();
        assert!(legal_moves(&board, sq("e8")).unwrap().contains(&sq("c8")));

        apply_move(&mut board, sq("e8"), sq("c8"));
        assert_eq!(board.piece_at(sq("c8")), Some((Piece::King, Color::Black)));
        assert_eq!(board.piece_at(sq("d8")), Some((Piece::Rook, Color::Black)));
        assert_eq!(board.piece_at(sq("a8")), None);
    }

    #[test]
    fn test_promotion() {
        let mut board = Board::from_diagram(
            "....k...
             P.......
             ........
             ........
             ........
             ........
             .......p
             ....K...",
        )
        .unwrap();

        apply_move(&mut board, sq("a7"), sq("a8"));
        assert_eq!(board.piece_at(sq("a8")), Some((Piece::Queen, Color::White)));

        apply_move(&mut board, sq("h2"), sq("h1"));
        assert_eq!(board.piece_at(sq("h1")), Some((Piece::Queen, Color::Black)));
    }

    #[test]
    fn test_no_promotion_short_of_last_rank() {
        let mut board = new_game();
        apply_move(&mut board, sq("a2"), sq("a4"));
        assert_eq!(board.piece_at(sq("a4")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn test_check() {
        let board = Board::from_diagram(
            "....k...
             ........
             ........
             ........
             ....Q...
             ........
             ........
             ...K....",
        )
        .unwrap();
        assert!(is_in_check(&board, Color::Black).unwrap());
        assert!(!is_in_check(&board, Color::White).unwrap());
        assert!(!is_checkmate(&board, Color::Black).unwrap());
    }

    #[test]
    fn test_checkmate() {
        // Back-rank mate.
        let board = Board::from_diagram(
            "R.....k.
             .....ppp
             ........
             ........
             ........
             ........
             ........
             ......K.",
        )
        .unwrap();
        assert!(is_in_check(&board, Color::Black).unwrap());
        assert!(is_checkmate(&board, Color::Black).unwrap());
        assert!(!is_checkmate(&board, Color::White).unwrap());
    }

    #[test]
    fn test_stalemate_counts_as_checkmate() {
        let board = Board::from_diagram(
            "k.......
             ........
             .Q......
             ........
             ........
             ........
             ........
             ......K.",
        )
        .unwrap();
        assert!(!is_in_check(&board, Color::Black).unwrap());
        assert!(is_checkmate(&board, Color::Black).unwrap());
        assert!(board.is_stalemate(Color::Black).unwrap());
    }

    #[test]
    fn test_best_move_depth_zero() {
        let board = new_game();
        let result = best_move(&board, 0, false, false).unwrap();
        assert_eq!(result.best, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_best_move_finds_mate() {
        let board = Board::from_diagram(
            "......k.
             .....ppp
             ........
             ........
             ........
             ........
             ........
             R.....K.",
        )
        .unwrap();
        let result = best_move(&board, 2, true, true).unwrap();
        assert_eq!(result.best, Some(Move::new(sq("a1"), sq("a8"))));
        assert_eq!(result.score, MATE_SCORE);
    }

    #[test]
    fn test_perft_initial_position() {
        let board = new_game();

        assert_eq!(perft(&board, 1), 20);
        assert_eq!(perft(&board, 2), 400);
        assert_eq!(perft(&board, 3), 8902);
    }

    // Helper function to perform perft
    fn perft(board: &Board, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = board.legal_moves(board.side_to_move()).unwrap();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            let mut new_board = board.clone();
            new_board.make_move(mv.from, mv.to);
            new_board.advance_turn();
            nodes += perft(&new_board, depth - 1);
        }

        nodes
    }
}
