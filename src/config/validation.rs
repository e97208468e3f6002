use std::collections::HashSet;

use super::schema::Config;
use crate::scoring::roster::{validate_player_count, validate_player_name};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(names) = config.player_names() {
        if let Err(e) = validate_player_count(names.len()) {
            errors.push(format!("players: {}", e));
        }
        let mut seen = HashSet::new();
        for (i, name) in names.iter().enumerate() {
            if let Err(e) = validate_player_name(name) {
                errors.push(format!("players[{}]: {}", i, e));
            } else if !seen.insert(name.as_str()) {
                errors.push(format!("players[{}]: duplicate name '{}'", i, name));
            }
        }
    }

    if let Some(ref entries) = config.fan_table {
        let mut seen = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.fan == 0 {
                errors.push(format!("fan_table[{}].fan: must be positive", i));
            }
            if entry.score == 0 {
                errors.push(format!("fan_table[{}].score: must be positive", i));
            }
            if !seen.insert(entry.fan) {
                errors.push(format!("fan_table[{}].fan: duplicate fan {}", i, entry.fan));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
