use crate::board::{Board, Color, Piece};
use crate::config::EngineConfig;
use crate::error::Result;

/// Scores are white-positive: material is the plain sum of square values.
pub type Score = i32;

/// Magnitude reserved for a forced mate.
pub const MATE_SCORE: Score = 1_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluator {
    pub threat: bool,
    pub defense: bool,
    pub strict_checkmate: bool,
}

impl Evaluator {
    /// Material only; stalemate counts as a loss.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            threat: config.evaluation.threat,
            defense: config.evaluation.defense,
            strict_checkmate: config.rules.strict_checkmate,
        }
    }

    /// Whether `color` has lost on this board. Without `strict_checkmate` a
    /// side with no legal moves has lost whether or not it is in check.
    pub fn is_lost(&self, board: &Board, color: Color) -> Result<bool> {
        if self.strict_checkmate {
            Ok(board.is_in_check(color)? && !board.has_legal_move(color)?)
        } else {
            board.is_checkmate(color)
        }
    }

    /// Terminal sentinels first (side to move, then opponent), then the
    /// static evaluation.
    pub fn score(&self, board: &Board) -> Result<Score> {
        let side = board.side_to_move();
        if self.is_lost(board, side)? {
            return Ok(-side.sign() * MATE_SCORE);
        }
        if self.is_lost(board, side.opposite())? {
            return Ok(side.sign() * MATE_SCORE);
        }
        if self.strict_checkmate && board.is_stalemate(side)? {
            return Ok(0);
        }
        self.evaluate(board)
    }

    pub fn evaluate(&self, board: &Board) -> Result<Score> {
        let mut score = board.material();
        let side = board.side_to_move();

        if self.threat {
            score += side.sign() * self.attacked_value(board, side)?;
        }
        if self.defense {
            score -= side.sign() * self.attacked_value(board, side.opposite())?;
        }

        Ok(score)
    }

    /// Sum of (victim magnitude / 10) over every legal capture available to
    /// the non-pawn pieces of `attacker`.
    fn attacked_value(&self, board: &Board, attacker: Color) -> Result<Score> {
        let mut total = 0;
        for from in board.pieces(attacker) {
            if board.value_at(from).abs() <= Piece::Pawn.value() {
                continue;
            }
            for to in board.possible_moves(from)? {
                let victim = board.value_at(to);
                if Color::of_value(victim) == Some(attacker.opposite()) {
                    total += victim.abs() as Score / 10;
                }
            }
        }
        Ok(total)
    }
}
