use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use gridmate::config::EngineConfig;
use gridmate::console::Console;

/// Play chess against the alpha-beta engine over stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "gridmate", version, about)]
struct Args {
    /// TOML file with [search], [evaluation] and [rules] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Reward pieces the side to move attacks
    #[arg(long)]
    threat: bool,

    /// Penalize pieces of the side to move that are under attack
    #[arg(long)]
    defense: bool,

    /// Score stalemate as a draw instead of a loss
    #[arg(long)]
    strict_checkmate: bool,

    /// Adjudicate on material at this turn; 0 disables the limit
    #[arg(long)]
    max_turns: Option<u32>,
}

impl Args {
    fn into_config(self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(depth) = self.depth {
            config.search.depth = depth;
        }
        config.evaluation.threat |= self.threat;
        config.evaluation.defense |= self.defense;
        config.rules.strict_checkmate |= self.strict_checkmate;
        if let Some(max_turns) = self.max_turns {
            config.rules.max_turns = max_turns;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Args::parse().into_config()?;
    info!("starting with {:?}", config);

    Console::new(config).run()
}
