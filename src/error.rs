use thiserror::Error;

use crate::board::{Color, GameStatus, Move, Square};

#[derive(Debug, Error)]
pub enum EngineError {
    /// The board is in a state the rules cannot reason about (e.g. a missing king).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid move '{0}'")]
    InvalidMove(String),

    #[error("invalid board diagram: {0}")]
    InvalidDiagram(String),

    #[error("empty square selected: {0}")]
    EmptySquare(Square),

    #[error("not your piece: {square} belongs to {owner:?}")]
    NotYourTurn { square: Square, owner: Color },

    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("game is over: {0:?}")]
    GameOver(GameStatus),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
