use std::fmt;

/// Marker for a self-draw in `a <winner> <fan> self`
pub const SELF_DRAW: &str = "self";
/// Marker for a self-draw off a gong in `a <winner> <fan> self-gong <loser>`
pub const SELF_DRAW_OFF_GONG: &str = "self-gong";

pub const HELP: &str = "Commands:
  ?
    Display help
  q
    Quit
  a <winner> <fan> self
    Add self-draw win by <winner>
  a <winner> <fan> self-gong <loser>
    Add self-draw win off <loser>'s gong
  a <winner> <fan> <loser>
    Add a win by <winner>, fed by <loser>
  d
    Delete the last-entered round
  d <round_number>
    Delete a specific round
  s
    Print short score report
  p
    Print full score report
  c
    Export results to CSV file
  x
    Print results as CSV
  f
    Show fan table
  f <fan> <score>
    Set the score for <fan>
  f default
    Reset the fan table to defaults";

/// A line split into its command word and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input<'a> {
    pub command: &'a str,
    pub args: Vec<&'a str>,
}

/// Split on whitespace. Blank lines yield None.
pub fn tokenize(line: &str) -> Option<Input<'_>> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    Some(Input {
        command,
        args: words.collect(),
    })
}

/// Who pays, as typed. Names are resolved against the roster later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payer {
    All,
    Loser(String),
    GongLoser(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanTableCommand {
    Show,
    Set { fan: String, score: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Add {
        winner: String,
        fan: String,
        payer: Payer,
    },
    /// 1-based round as typed; None deletes the last round
    Delete(Option<String>),
    Tally,
    Report,
    ExportCsv,
    PrintCsv,
    FanTable(FanTableCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    Usage(&'static str),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(_) => write!(f, "Invalid command. Type ? for help."),
            CommandError::Usage(usage) => write!(f, "Usage: {}", usage),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    pub fn parse(input: &Input<'_>) -> Result<Self, CommandError> {
        let args = &input.args;
        match input.command {
            "?" => Ok(Command::Help),
            "q" => Ok(Command::Quit),
            "a" => parse_add(args),
            "d" => Ok(Command::Delete(args.first().map(|s| s.to_string()))),
            "s" => Ok(Command::Tally),
            "p" => Ok(Command::Report),
            "c" => Ok(Command::ExportCsv),
            "x" => Ok(Command::PrintCsv),
            "f" => match args.as_slice() {
                [] => Ok(Command::FanTable(FanTableCommand::Show)),
                ["default"] => Ok(Command::FanTable(FanTableCommand::Reset)),
                [fan, score] => Ok(Command::FanTable(FanTableCommand::Set {
                    fan: fan.to_string(),
                    score: score.to_string(),
                })),
                _ => Err(CommandError::Usage("f | f <fan> <score> | f default")),
            },
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Whether the command changes the game and belongs in the history file
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Delete(_)
                | Command::FanTable(FanTableCommand::Set { .. })
                | Command::FanTable(FanTableCommand::Reset)
        )
    }
}

fn parse_add(args: &[&str]) -> Result<Command, CommandError> {
    const USAGE: &str = "a <winner> <fan> self | a <winner> <fan> self-gong <loser> | a <winner> <fan> <loser>";

    let (winner, fan, rest) = match args {
        [winner, fan, rest @ ..] if !rest.is_empty() => (winner, fan, rest),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    let payer = match rest {
        [marker, ..] if *marker == SELF_DRAW => Payer::All,
        [marker, loser, ..] if *marker == SELF_DRAW_OFF_GONG => Payer::GongLoser(loser.to_string()),
        [marker] if *marker == SELF_DRAW_OFF_GONG => return Err(CommandError::Usage(USAGE)),
        [loser, ..] => Payer::Loser(loser.to_string()),
        [] => return Err(CommandError::Usage(USAGE)),
    };

    Ok(Command::Add {
        winner: winner.to_string(),
        fan: fan.to_string(),
        payer,
    })
}
