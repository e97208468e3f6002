use anyhow::Result;
use std::io::{BufRead, Write};

use super::{tokenize, Session};
use crate::config::Config;
use crate::scoring::roster::{validate_player_count, validate_player_name};
use crate::scoring::{parse_positive, ScoringEngine, RESERVED_NAMES};

const FAN_PROMPT: &str = "Add fan/score (Enter to finish, \"d\" for default): ";

impl<R: BufRead, W: Write> Session<R, W> {
    /// Build the engine: roster first, then the fan table. Config values skip
    /// the matching prompts. None if input ends before setup is complete.
    pub(super) fn setup(&mut self, config: &Config) -> Result<Option<ScoringEngine>> {
        let names = match config.player_names() {
            Some(names) => {
                if self.options.verbose {
                    eprintln!("Players from config: {}", names.join(", "));
                }
                names
            }
            None => {
                let count = match self.read_player_count()? {
                    Some(count) => count,
                    None => return Ok(None),
                };
                match self.read_player_names(count)? {
                    Some(names) => names,
                    None => return Ok(None),
                }
            }
        };

        let configured_table = config.fan_table();
        let prompt_for_table = configured_table.is_none();
        let mut engine =
            ScoringEngine::with_fan_table(names.len(), names, configured_table.unwrap_or_default())?;

        if prompt_for_table {
            writeln!(self.out)?;
            if !self.read_fan_table(&mut engine)? {
                return Ok(None);
            }
        } else if self.options.verbose {
            eprintln!("Fan table from config: {} entries", engine.fan_table().len());
        }

        Ok(Some(engine))
    }

    fn read_player_count(&mut self) -> Result<Option<usize>> {
        loop {
            let line = match self.prompt("How many players? ")? {
                Some(line) => line,
                None => return Ok(None),
            };

            match line.trim().parse::<usize>() {
                Ok(count) if validate_player_count(count).is_ok() => {
                    self.record(&line);
                    return Ok(Some(count));
                }
                _ => writeln!(self.out, "Invalid player count.")?,
            }
        }
    }

    fn read_player_names(&mut self, count: usize) -> Result<Option<Vec<String>>> {
        let mut names: Vec<String> = Vec::with_capacity(count);
        while names.len() < count {
            let prompt = format!("Initials for player {}: ", names.len() + 1);
            let line = match self.prompt(&prompt)? {
                Some(line) => line,
                None => return Ok(None),
            };

            let name = line.trim().to_uppercase();
            if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(&name)) {
                writeln!(self.out, "Players cannot be named \"{}\".", line.trim())?;
                continue;
            }
            if let Err(e) = validate_player_name(&name) {
                writeln!(self.out, "{}", e)?;
                continue;
            }
            if names.contains(&name) {
                writeln!(self.out, "{} is already playing.", name)?;
                continue;
            }

            self.record(&line);
            names.push(name);
        }
        Ok(Some(names))
    }

    /// Returns false if input ended before the table was finished.
    fn read_fan_table(&mut self, engine: &mut ScoringEngine) -> Result<bool> {
        loop {
            let line = match self.prompt(FAN_PROMPT)? {
                Some(line) => line,
                None => return Ok(false),
            };

            let input = match tokenize(&line) {
                Some(input) => input,
                None => {
                    if engine.fan_table().is_empty() {
                        writeln!(
                            self.out,
                            "Enter at least one fan/score pair, or \"d\" for default."
                        )?;
                        continue;
                    }
                    self.record(&line);
                    return Ok(true);
                }
            };

            if input.command.starts_with('d') {
                self.record(&line);
                self.reset_fan_table(engine)?;
                return Ok(true);
            }

            let pair = match input.args.first() {
                Some(score) => parse_positive(input.command).and_then(|fan| {
                    parse_positive(score).map(|score| (fan, score))
                }),
                None => {
                    writeln!(self.out, "Invalid input.")?;
                    continue;
                }
            };

            match pair.and_then(|(fan, score)| {
                engine
                    .configure_fan_score(fan, score)
                    .map(|update| (fan, score, update))
            }) {
                Ok((fan, score, update)) => {
                    self.record(&line);
                    self.report_table_update(fan, score, update)?;
                }
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }
    }
}
