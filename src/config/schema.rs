use serde::{Deserialize, Serialize};

use crate::scoring::FanScoreTable;

/// Optional settings file.
///
/// Example YAML:
/// ```yaml
/// players: ["AB", "CD", "EF", "GH"]
/// fan_table:
///   - { fan: 3, score: 32 }
///   - { fan: 5, score: 64 }
/// export_dir: ~/mahjong
/// history: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Player initials; skips the roster prompts when set
    #[serde(default)]
    pub players: Option<Vec<String>>,

    /// Fan/score entries; skips the fan table prompts when set
    #[serde(default)]
    pub fan_table: Option<Vec<FanScoreEntry>>,

    /// Install the built-in schedule without prompting (ignored if fan_table is set)
    #[serde(default)]
    pub use_default_fan_table: bool,

    /// Directory for CSV exports (default: current directory)
    #[serde(default)]
    pub export_dir: Option<String>,

    /// Write accepted commands to a history file (default: true)
    #[serde(default)]
    pub history: Option<bool>,

    /// Directory for history files (default: ~/.config/pure-honours/history)
    #[serde(default)]
    pub history_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FanScoreEntry {
    pub fan: u32,
    pub score: u32,
}

impl Config {
    pub fn history_enabled(&self) -> bool {
        self.history.unwrap_or(true)
    }

    /// Configured players, uppercased like typed initials
    pub fn player_names(&self) -> Option<Vec<String>> {
        self.players
            .as_ref()
            .map(|names| names.iter().map(|n| n.trim().to_uppercase()).collect())
    }

    /// Fan table to install before play, if the config decides it
    pub fn fan_table(&self) -> Option<FanScoreTable> {
        match &self.fan_table {
            Some(entries) => Some(entries.iter().map(|e| (e.fan, e.score)).collect()),
            None if self.use_default_fan_table => Some(FanScoreTable::with_defaults()),
            None => None,
        }
    }
}
