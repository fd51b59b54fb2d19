//! Line-oriented text front end for playing against the engine.
//!
//! Commands: `new`, `show`, `moves <sq>`, `move <from><to>`, `go [depth <n>]`,
//! `status`, `quit`.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::warn;

use crate::board::{GameStatus, Move, Square};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::game::Game;

pub struct Console {
    game: Game,
}

impl Console {
    pub fn new(config: EngineConfig) -> Self {
        Console {
            game: Game::new(config),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }
            let response = self.handle_command(command)?;
            write!(stdout, "{}", response)?;
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    /// Handles one command and returns the reply text. Rejected moves and
    /// bad input are replies, not errors.
    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(String::new());
        }

        let reply = match parts[0] {
            "new" => {
                self.game.reset();
                "ok\n".to_string()
            }
            "show" => self.game.board().to_string(),
            "status" => self.handle_status(),
            "moves" => self.handle_moves(&parts[1..])?,
            "move" => self.handle_move(&parts[1..])?,
            "go" => self.handle_go(&parts[1..])?,
            "quit" => String::new(),
            other => {
                warn!("unknown command '{}'", other);
                format!("error unknown command '{}'\n", other)
            }
        };
        Ok(reply)
    }

    fn handle_status(&self) -> String {
        let status = match self.game.status() {
            GameStatus::InProgress => format!("{:?} to move", self.game.side_to_move()),
            GameStatus::WhiteWins => "white wins".to_string(),
            GameStatus::BlackWins => "black wins".to_string(),
            GameStatus::Draw => "draw".to_string(),
        };
        format!("turn {} {}\n", self.game.board().turn(), status)
    }

    fn handle_moves(&self, parts: &[&str]) -> Result<String> {
        let square: Square = match parts.first().map(|s| s.parse()) {
            Some(Ok(square)) => square,
            Some(Err(err)) => return Ok(rejection(&err)),
            None => return Ok("error usage: moves <square>\n".to_string()),
        };
        let board = self.game.board();
        let reply = match board.piece_at(square) {
            None => rejection(&EngineError::EmptySquare(square)),
            Some((_, owner)) if owner != self.game.side_to_move() => {
                rejection(&EngineError::NotYourTurn { square, owner })
            }
            Some(_) => {
                let moves = self.game.legal_moves(square)?;
                let names: Vec<String> = moves.iter().map(|sq| sq.to_string()).collect();
                format!("moves {}\n", names.join(" "))
            }
        };
        Ok(reply)
    }

    fn handle_move(&mut self, parts: &[&str]) -> Result<String> {
        let mv: Move = match parts.first().map(|s| s.parse()) {
            Some(Ok(mv)) => mv,
            Some(Err(err)) => return Ok(rejection(&err)),
            None => return Ok("error usage: move <from><to>\n".to_string()),
        };
        match self.game.play(mv.from, mv.to) {
            Ok(_) => Ok(format!("ok {}\n{}", mv, self.handle_status())),
            Err(err @ (EngineError::EmptySquare(_)
            | EngineError::NotYourTurn { .. }
            | EngineError::IllegalMove(_)
            | EngineError::GameOver(_))) => Ok(rejection(&err)),
            Err(err) => Err(err.into()),
        }
    }

    fn handle_go(&mut self, parts: &[&str]) -> Result<String> {
        let mut depth = self.game.config().search.depth;
        let mut i = 0;
        while i < parts.len() {
            if parts[i] == "depth" {
                if let Some(d) = parts.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    depth = d;
                }
                i += 1;
            }
            i += 1;
        }

        match self.game.engine_move_at(depth) {
            Ok(result) => {
                let best = match result.best {
                    Some(mv) => mv.to_string(),
                    None => "(none)".to_string(),
                };
                Ok(format!(
                    "bestmove {} score {}\n{}",
                    best,
                    result.score,
                    self.handle_status()
                ))
            }
            Err(err @ EngineError::GameOver(_)) => Ok(rejection(&err)),
            Err(err) => Err(err.into()),
        }
    }
}

fn rejection(err: &EngineError) -> String {
    warn!("{}", err);
    format!("error {}\n", err)
}
