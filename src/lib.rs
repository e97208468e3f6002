//! Scorekeeper for Pure Honours rounds.
//!
//! [`scoring`] holds the fan table and the zero-sum round ledger, [`output`]
//! renders it, [`session`] is the interactive front end and [`config`] loads
//! optional settings.

pub mod config;
pub mod output;
pub mod scoring;
pub mod session;

pub use scoring::{FanScoreTable, RoundResult, ScoringEngine, ScoringError, WinKind};
