use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Color, Move, Piece, Square};
use crate::evaluation::Score;

const ZOBRIST_SEED: u64 = 0x6772_6964_6d61_7465;

/// Random keys for every (color, piece, square); a grid hashes to the XOR of
/// the keys of its occupied squares.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    pieces: [[[u64; 64]; 6]; 2],
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in pieces.iter_mut() {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        Self { pieces }
    }

    /// Hashes square values only; moved flags and the turn counter are not
    /// part of the key.
    pub fn hash(&self, board: &Board) -> u64 {
        let mut hash = 0;
        for square in Square::all() {
            if let Some((piece, color)) = board.piece_at(square) {
                hash ^= self.piece_key(piece, color, square);
            }
        }
        hash
    }

    fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[color.index()][piece.index()][square.index()]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub best_move: Move,
    pub score: Score,
}

/// Search memo shared by every board simulated during a game. Entries are
/// never evicted; [`TranspositionTable::clear`] resets it between games.
#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    keys: ZobristKeys,
    maximizing: HashMap<u64, TranspositionEntry>,
    minimizing: HashMap<u64, TranspositionEntry>,
    leaf_scores: HashMap<(u64, Color), Score>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self, board: &Board) -> u64 {
        self.keys.hash(board)
    }

    fn table(&self, maximizing: bool) -> &HashMap<u64, TranspositionEntry> {
        if maximizing {
            &self.maximizing
        } else {
            &self.minimizing
        }
    }

    pub fn probe(&self, hash: u64, maximizing: bool) -> Option<TranspositionEntry> {
        self.table(maximizing).get(&hash).copied()
    }

    pub fn store(&mut self, hash: u64, maximizing: bool, entry: TranspositionEntry) {
        let table = if maximizing {
            &mut self.maximizing
        } else {
            &mut self.minimizing
        };
        table.insert(hash, entry);
    }

    pub fn probe_score(&self, hash: u64, side: Color) -> Option<Score> {
        self.leaf_scores.get(&(hash, side)).copied()
    }

    pub fn store_score(&mut self, hash: u64, side: Color, score: Score) {
        self.leaf_scores.insert((hash, side), score);
    }

    /// Number of search entries across both tables.
    pub fn len(&self) -> usize {
        self.maximizing.len() + self.minimizing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.leaf_scores.is_empty()
    }

    pub fn clear(&mut self) {
        self.maximizing.clear();
        self.minimizing.clear();
        self.leaf_scores.clear();
    }
}
