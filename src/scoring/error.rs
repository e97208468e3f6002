use std::fmt;

/// Everything the scoring core can reject.
///
/// All variants are recoverable: the caller reports the message and asks again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Player count outside 2..=4, or a roster whose length disagrees with it.
    InvalidPlayerCount(usize),
    /// Empty, duplicate or reserved player name.
    InvalidOrReservedPlayerName(String),
    /// Name lookup miss or a roster index past the end.
    UnknownPlayer(String),
    /// Non-numeric or non-positive fan (or score) value.
    InvalidFanValue(String),
    /// The fan table resolves this many fan to zero points.
    BelowMinimumFan(u32),
    /// A fed win where the loser is the winner.
    LoserIsWinner(String),
    /// 1-based round number outside the ledger.
    InvalidRoundIndex(usize),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::InvalidPlayerCount(n) => {
                write!(f, "Invalid player count: {} (must be 2 to 4)", n)
            }
            ScoringError::InvalidOrReservedPlayerName(name) => {
                write!(f, "Invalid player name: '{}'", name)
            }
            ScoringError::UnknownPlayer(name) => write!(f, "Unknown player: '{}'", name),
            ScoringError::InvalidFanValue(value) => write!(f, "Invalid fan value: '{}'", value),
            ScoringError::BelowMinimumFan(fan) => {
                write!(f, "{} fan is below the minimum in the fan table", fan)
            }
            ScoringError::LoserIsWinner(name) => {
                write!(f, "{} cannot pay for their own win", name)
            }
            ScoringError::InvalidRoundIndex(n) => write!(f, "Invalid round number: {}", n),
        }
    }
}

impl std::error::Error for ScoringError {}
