//! One game session: the live board, the search engine with its cache, and
//! the configuration both were built from.

use log::{info, warn};

use crate::board::{Board, Color, GameStatus, Move, Square};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::evaluation::Score;
use crate::search::{Search, SearchResult};

pub struct Game {
    board: Board,
    search: Search,
    config: EngineConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Game {
    pub fn new(config: EngineConfig) -> Self {
        Self::from_board(Board::new(), config)
    }

    pub fn from_board(board: Board, config: EngineConfig) -> Self {
        Self {
            board,
            search: Search::from_config(&config),
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// Fresh starting position; the cache is dropped with the old game.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.search.clear();
        info!("new game");
    }

    /// Legal destinations for the piece on `square`. Empty for empty
    /// squares, for the opponent's pieces and once the game is over.
    pub fn legal_moves(&self, square: Square) -> Result<Vec<Square>> {
        if self.status().is_over() {
            return Ok(Vec::new());
        }
        match self.board.piece_at(square) {
            Some((_, color)) if color == self.side_to_move() => self.board.possible_moves(square),
            _ => Ok(Vec::new()),
        }
    }

    /// Validates and plays a move for the side to move, then advances the
    /// turn and updates the game status.
    pub fn play(&mut self, from: Square, to: Square) -> Result<GameStatus> {
        if self.status().is_over() {
            return Err(EngineError::GameOver(self.status()));
        }
        let (_, owner) = self
            .board
            .piece_at(from)
            .ok_or(EngineError::EmptySquare(from))?;
        if owner != self.side_to_move() {
            return Err(EngineError::NotYourTurn {
                square: from,
                owner,
            });
        }
        if !self.board.possible_moves(from)?.contains(&to) {
            return Err(EngineError::IllegalMove(Move::new(from, to)));
        }

        self.board.make_move(from, to);
        self.board.advance_turn();
        info!("{:?} played {}{}", owner, from, to);

        self.update_status()
    }

    /// Searches at the configured depth and plays the result.
    pub fn engine_move(&mut self) -> Result<SearchResult> {
        let depth = self.config.search.depth;
        self.engine_move_at(depth)
    }

    pub fn engine_move_at(&mut self, depth: u32) -> Result<SearchResult> {
        if self.status().is_over() {
            return Err(EngineError::GameOver(self.status()));
        }
        let mut result = self.search.find_best_move(&self.board, depth)?;
        if let Some(mv) = result.best {
            // The cache is keyed on the grid alone, so a root hit can carry a
            // move that lost its castling rights since it was stored.
            if !self.board.possible_moves(mv.from)?.contains(&mv.to) {
                warn!("cached move {} is illegal here, searching again", mv);
                self.search.clear();
                result = self.search.find_best_move(&self.board, depth)?;
            }
        }
        match result.best {
            Some(mv) => {
                self.play(mv.from, mv.to)?;
            }
            None => {
                // The engine's side has nothing to play.
                self.update_status()?;
                if !self.status().is_over() {
                    return Err(EngineError::InvariantViolation(
                        "search returned no move in an ongoing game".to_string(),
                    ));
                }
            }
        }
        Ok(result)
    }

    /// Evaluation of the live board from white's point of view.
    pub fn score(&mut self) -> Result<Score> {
        self.search.score(&self.board)
    }

    fn update_status(&mut self) -> Result<GameStatus> {
        let side = self.side_to_move();
        let evaluator = self.search.evaluator();

        let status = if evaluator.is_lost(&self.board, side)? {
            GameStatus::mated(side)
        } else if self.config.rules.strict_checkmate && self.board.is_stalemate(side)? {
            GameStatus::Draw
        } else if self.config.rules.max_turns > 0 && self.board.turn() > self.config.rules.max_turns {
            self.adjudicate()
        } else {
            GameStatus::InProgress
        };

        if status.is_over() {
            info!("game over after {} turns: {:?}", self.board.turn(), status);
        }
        self.board.set_status(status);
        Ok(status)
    }

    /// Material decides a game that hits the turn limit.
    fn adjudicate(&self) -> GameStatus {
        match self.board.material() {
            m if m > 0 => GameStatus::WhiteWins,
            m if m < 0 => GameStatus::BlackWins,
            _ => GameStatus::Draw,
        }
    }
}
