use clap::Parser;
use std::io::{BufRead, Cursor, Read};
use std::path::PathBuf;

use pure_honours::session::{HistoryLog, Session, SessionOptions};

const EXIT_SUCCESS: i32 = 0;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "pure-honours")]
#[command(about = "Scorekeeper for Pure Honours games", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pure-honours/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Replay a history file before reading from the terminal
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Do not write a history file
    #[arg(long)]
    no_history: bool,
}

fn main() {
    let cli = Cli::parse();

    // Load config
    let config_path = match pure_honours::config::resolve_config_path(cli.config.map(PathBuf::from)) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if cli.verbose {
        match &config_path {
            Some(path) => eprintln!("Loaded config from {}", path.display()),
            None => eprintln!("No config file found, using built-in defaults"),
        }
    }

    let config = match pure_honours::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = pure_honours::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut options = SessionOptions::new(pure_honours::config::export_dir(&config));
    options.verbose = cli.verbose;
    options.use_colors = !cli.no_color && pure_honours::output::should_use_colors();

    if config.history_enabled() && !cli.no_history {
        match pure_honours::config::history_dir(&config) {
            Ok(dir) => {
                let log = HistoryLog::new(&dir, &options.started_at);
                if cli.verbose {
                    eprintln!("Recording history to {}", log.path().display());
                }
                options.history = Some(log);
            }
            Err(e) => eprintln!("History disabled: {:#}", e),
        }
    }

    let replayed = match &cli.replay {
        Some(path) => match pure_honours::session::load_history(path) {
            Ok(content) => {
                if cli.verbose {
                    eprintln!("Replaying {} lines from {}", content.lines().count(), path.display());
                }
                content
            }
            Err(e) => {
                eprintln!("Replay error: {:#}", e);
                std::process::exit(EXIT_IO);
            }
        },
        None => String::new(),
    };

    let stdin = std::io::stdin();
    let input: Box<dyn BufRead> = Box::new(Cursor::new(replayed).chain(stdin.lock()));
    let mut session = Session::new(input, std::io::stdout(), options);

    match session.run(&config) {
        Ok(Some(engine)) => {
            if cli.verbose {
                eprintln!("Session ended after {} rounds", engine.round_count());
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Ok(None) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_IO);
        }
    }
}
