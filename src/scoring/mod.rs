pub mod engine;
pub mod error;
pub mod roster;
pub mod table;

pub use engine::{Advisory, RoundResult, RoundSummary, RoundView, ScoreRow, ScoringEngine, WinKind};
pub use error::ScoringError;
pub use roster::{PlayerIndex, Roster, MAX_PLAYERS, MIN_PLAYERS, RESERVED_NAMES};
pub use table::{parse_positive, FanScoreTable, TableUpdate, DEFAULT_FAN_SCORES};
