//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! [search]
//! depth = 3
//!
//! [evaluation]
//! threat = true
//! defense = false
//!
//! [rules]
//! strict_checkmate = false
//! max_turns = 150
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth in plies.
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { depth: 3 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Reward the side to move for pieces it attacks.
    pub threat: bool,
    /// Penalize the side to move for its pieces under attack.
    pub defense: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Only a side in check with no legal moves is mated; a side with no
    /// moves and not in check is stalemated (scored and adjudicated as a draw).
    pub strict_checkmate: bool,
    /// Last turn that is played out; once the counter passes it the game is
    /// adjudicated on material. 0 disables the limit.
    pub max_turns: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            strict_checkmate: false,
            max_turns: 150,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub evaluation: EvaluationConfig,
    pub rules: RulesConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
