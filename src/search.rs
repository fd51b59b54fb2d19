use log::debug;

use crate::board::{Board, Color, Move};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::evaluation::{Evaluator, Score};
use crate::transposition::{TranspositionEntry, TranspositionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` at leaves and when the side to move has no legal move.
    pub best: Option<Move>,
    pub score: Score,
}

impl SearchResult {
    fn leaf(score: Score) -> Self {
        Self { best: None, score }
    }
}

/// Minimax with alpha-beta pruning over cloned boards. Owns the
/// transposition table, so every simulated board in a game shares it.
pub struct Search {
    evaluator: Evaluator,
    transposition_table: TranspositionTable,
    nodes_searched: u64,
    cache_hits: u64,
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Search {
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::new())
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            transposition_table: TranspositionTable::new(),
            nodes_searched: 0,
            cache_hits: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_evaluator(Evaluator::from_config(config))
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Searches for the side to move with a full window.
    pub fn find_best_move(&mut self, board: &Board, depth: u32) -> Result<SearchResult> {
        self.nodes_searched = 0;
        self.cache_hits = 0;

        let maximizing = board.side_to_move() == Color::White;
        let result = self.minimax(board, depth, Score::MIN, Score::MAX, maximizing)?;

        debug!(
            "depth {} search: {} nodes, {} cache hits, {} cached entries, best {:?} score {}",
            depth,
            self.nodes_searched,
            self.cache_hits,
            self.transposition_table.len(),
            result.best.map(|mv| mv.to_string()),
            result.score
        );
        Ok(result)
    }

    /// White maximizes, black minimizes. A cache hit for the same grid and
    /// `maximizing` flag is returned as is, whatever depth or window
    /// produced it.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Result<SearchResult> {
        self.nodes_searched += 1;

        let side = if maximizing { Color::White } else { Color::Black };
        if depth == 0 || !board.has_legal_move(side)? {
            return Ok(SearchResult::leaf(self.score(board)?));
        }

        let hash = self.transposition_table.hash(board);
        if let Some(entry) = self.transposition_table.probe(hash, maximizing) {
            self.cache_hits += 1;
            return Ok(SearchResult {
                best: Some(entry.best_move),
                score: entry.score,
            });
        }

        let mut best_move = None;
        let mut best_score = if maximizing { Score::MIN } else { Score::MAX };

        'movers: for from in board.pieces(side) {
            for to in board.possible_moves(from)? {
                let mut new_board = board.clone();
                new_board.make_move(from, to);
                new_board.advance_turn();

                let eval = self
                    .minimax(&new_board, depth - 1, alpha, beta, !maximizing)?
                    .score;

                let improved = if maximizing {
                    eval > best_score
                } else {
                    eval < best_score
                };
                if improved {
                    let mv = Move::new(from, to);
                    best_move = Some(mv);
                    best_score = eval;
                    self.transposition_table.store(
                        hash,
                        maximizing,
                        TranspositionEntry {
                            best_move: mv,
                            score: eval,
                        },
                    );
                }

                if maximizing {
                    alpha = alpha.max(eval);
                } else {
                    beta = beta.min(eval);
                }
                if beta <= alpha {
                    break 'movers;
                }
            }
        }

        Ok(SearchResult {
            best: best_move,
            score: best_score,
        })
    }

    /// Leaf score through the shared leaf-score table.
    pub fn score(&mut self, board: &Board) -> Result<Score> {
        let hash = self.transposition_table.hash(board);
        let side = board.side_to_move();
        if let Some(score) = self.transposition_table.probe_score(hash, side) {
            return Ok(score);
        }
        let score = self.evaluator.score(board)?;
        self.transposition_table.store_score(hash, side, score);
        Ok(score)
    }

    /// Forget everything cached; call between games.
    pub fn clear(&mut self) {
        self.transposition_table.clear();
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.transposition_table
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn get_cache_hits(&self) -> u64 {
        self.cache_hits
    }
}
