pub mod command;
pub mod history;
mod setup;

pub use command::{tokenize, Command, CommandError, FanTableCommand, Input, Payer, HELP};
pub use history::{load_history, HistoryLog};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::output::{export_csv, format_fan_table, format_tally};
use crate::scoring::{parse_positive, Advisory, ScoringEngine, ScoringError, TableUpdate, WinKind};

const COMMAND_PROMPT: &str = "\nInput command (? for help): ";

/// Everything the session needs besides its input and output
#[derive(Debug)]
pub struct SessionOptions {
    pub verbose: bool,
    pub use_colors: bool,
    pub export_dir: PathBuf,
    pub history: Option<HistoryLog>,
    pub started_at: DateTime<Local>,
}

impl SessionOptions {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            verbose: false,
            use_colors: false,
            export_dir,
            history: None,
            started_at: Local::now(),
        }
    }
}

/// Interactive scorekeeping session: setup prompts, then the command loop.
///
/// Generic over input and output so a replayed history (or a test) can drive it.
pub struct Session<R, W> {
    input: R,
    out: W,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, options: SessionOptions) -> Self {
        Self { input, out, options }
    }

    /// Run setup and the command loop until `q` or end of input.
    /// Returns the engine as it stood when the session ended, if setup finished.
    pub fn run(&mut self, config: &Config) -> Result<Option<ScoringEngine>> {
        let mut engine = match self.setup(config)? {
            Some(engine) => engine,
            None => return Ok(None),
        };

        while let Some(line) = self.prompt(COMMAND_PROMPT)? {
            let input = match tokenize(&line) {
                Some(input) => input,
                None => continue,
            };

            let command = match Command::parse(&input) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{}", e)?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            let is_mutation = command.is_mutation();
            match self.execute(&mut engine, command) {
                Ok(()) => {
                    if is_mutation {
                        self.record(&line);
                    }
                }
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }

        Ok(Some(engine))
    }

    /// Carry out one parsed command. Rejections come back as `ScoringError`
    /// and leave the engine untouched.
    fn execute(&mut self, engine: &mut ScoringEngine, command: Command) -> Result<(), SessionError> {
        match command {
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => {}
            Command::Add { winner, fan, payer } => {
                let winner = resolve_player(engine, &winner)?;
                let fan = parse_positive(&fan)?;
                let kind = match payer {
                    Payer::All => WinKind::SelfDraw,
                    Payer::Loser(name) => WinKind::Fed {
                        loser: resolve_player(engine, &name)?,
                    },
                    Payer::GongLoser(name) => WinKind::SelfDrawOffGong {
                        liable: resolve_player(engine, &name)?,
                    },
                };

                let summary = engine.record_result(winner, fan, kind)?;
                if let Some(Advisory::AtOrAboveMaximumFan { max }) = summary.advisory {
                    writeln!(self.out, "Maximum fan reached ({} or more).", max)?;
                }
                writeln!(self.out, "Round {}: {}", summary.round, summary.description)?;
                writeln!(
                    self.out,
                    "{}",
                    format_tally(engine.player_names(), &summary.tally, self.options.use_colors)
                )?;
            }
            Command::Delete(None) => {
                if engine.delete_last() {
                    writeln!(self.out, "Deleted last round.")?;
                } else {
                    return Err(SessionError::Rejected("No entries to delete.".to_string()));
                }
            }
            Command::Delete(Some(round)) => {
                let index = round
                    .parse::<usize>()
                    .map_err(|_| SessionError::Rejected(format!("Invalid round number: {}", round)))?;
                engine.remove_round(index)?;
                writeln!(self.out, "Deleted round {}.", index)?;
            }
            Command::Tally => writeln!(
                self.out,
                "{}",
                format_tally(engine.player_names(), &engine.tally(), self.options.use_colors)
            )?,
            Command::Report => writeln!(self.out, "{}", engine.render_table())?,
            Command::PrintCsv => writeln!(self.out, "{}", engine.render_csv())?,
            Command::ExportCsv => {
                let path = export_csv(engine, &self.options.export_dir, &self.options.started_at)
                    .map_err(|e| SessionError::Rejected(format!("Export failed: {:#}", e)))?;
                writeln!(self.out, "Exported results to {}", path.display())?;
            }
            Command::FanTable(FanTableCommand::Show) => {
                writeln!(self.out, "{}", format_fan_table(engine.fan_table()))?
            }
            Command::FanTable(FanTableCommand::Set { fan, score }) => {
                let fan = parse_positive(&fan)?;
                let score = parse_positive(&score)?;
                let update = engine.configure_fan_score(fan, score)?;
                self.report_table_update(fan, score, update)?;
            }
            Command::FanTable(FanTableCommand::Reset) => {
                self.reset_fan_table(engine)?;
            }
        }
        Ok(())
    }

    fn report_table_update(&mut self, fan: u32, score: u32, update: TableUpdate) -> std::io::Result<()> {
        match update {
            TableUpdate::Inserted => writeln!(self.out, "Added {} fan = {}.", fan, score),
            TableUpdate::Replaced { previous } => {
                writeln!(self.out, "Set {} fan = {} (was {}).", fan, score, previous)
            }
        }
    }

    fn reset_fan_table(&mut self, engine: &mut ScoringEngine) -> std::io::Result<()> {
        if engine.reset_fan_table() {
            writeln!(self.out, "Cleared existing fan/score pairs.")?;
        }
        writeln!(self.out, "{}", format_fan_table(engine.fan_table()))
    }

    /// Print `message` and read one line. None at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Keep an accepted line in the history file. A failing history write is
    /// reported but does not end the game.
    fn record(&mut self, line: &str) {
        if self.options.verbose {
            eprintln!("Accepted: {}", line);
        }
        if let Some(history) = self.options.history.as_mut() {
            if let Err(e) = history.record(line) {
                eprintln!("History not saved: {:#}", e);
            }
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Uppercase typed initials and find them in the roster
fn resolve_player(engine: &ScoringEngine, name: &str) -> Result<usize, ScoringError> {
    let name = name.to_uppercase();
    engine
        .player_index(&name)
        .ok_or(ScoringError::UnknownPlayer(name))
}

/// Why a command was not carried out
#[derive(Debug)]
enum SessionError {
    Scoring(ScoringError),
    Rejected(String),
    Io(std::io::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Scoring(e) => write!(f, "{}", e),
            SessionError::Rejected(msg) => write!(f, "{}", msg),
            SessionError::Io(e) => write!(f, "Output error: {}", e),
        }
    }
}

impl From<ScoringError> for SessionError {
    fn from(e: ScoringError) -> Self {
        SessionError::Scoring(e)
    }
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Io(e)
    }
}
