use super::error::ScoringError;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Tokens the command grammar uses as markers; never valid player names.
pub const RESERVED_NAMES: [&str; 2] = ["self", "self-gong"];

/// Index of a player in the roster
pub type PlayerIndex = usize;

/// Fixed, ordered list of unique player names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Validate `names` against `player_count`.
    pub fn new(player_count: usize, names: Vec<String>) -> Result<Self, ScoringError> {
        validate_player_count(player_count)?;
        if names.len() != player_count {
            return Err(ScoringError::InvalidPlayerCount(names.len()));
        }

        for (i, name) in names.iter().enumerate() {
            validate_player_name(name)?;
            if names[..i].contains(name) {
                return Err(ScoringError::InvalidOrReservedPlayerName(name.clone()));
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact, case-sensitive lookup
    pub fn index_of(&self, name: &str) -> Option<PlayerIndex> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, index: PlayerIndex) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

pub fn validate_player_count(player_count: usize) -> Result<(), ScoringError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        Ok(())
    } else {
        Err(ScoringError::InvalidPlayerCount(player_count))
    }
}

/// Reject empty names, names with whitespace or commas (they would break the
/// command grammar and CSV header) and the reserved marker tokens.
pub fn validate_player_name(name: &str) -> Result<(), ScoringError> {
    let reserved = RESERVED_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(name));
    if name.is_empty() || reserved || name.contains(|c: char| c.is_whitespace() || c == ',') {
        Err(ScoringError::InvalidOrReservedPlayerName(name.to_string()))
    } else {
        Ok(())
    }
}
