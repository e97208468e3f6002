use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::output::file_stem;

/// Accepted input lines of one session, mirrored to a file.
///
/// The whole file is rewritten atomically after every accepted line, so it is
/// never left half-written and can always be replayed.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    lines: Vec<String>,
}

impl HistoryLog {
    /// History file for a session started at `started_at`, inside `dir`
    pub fn new(dir: &Path, started_at: &DateTime<Local>) -> Self {
        Self {
            path: dir.join(format!("{}.txt", file_stem(started_at))),
            lines: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append a raw input line and rewrite the file
    pub fn record(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create history directory {}", parent.display()))?;
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open atomic write file at {}", self.path.display()))?;
        for line in &self.lines {
            writeln!(file, "{}", line).context("Failed to write history")?;
        }
        file.commit().context("Failed to save history")?;

        Ok(())
    }
}

/// Read a history file for replay
pub fn load_history(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file at {}", path.display()))
}
