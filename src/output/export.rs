use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::ScoringEngine;

const FILE_PREFIX: &str = "purehonours";

/// File name stem shared by exports and history files, e.g.
/// "purehonours-20261016-213005"
pub fn file_stem(started_at: &DateTime<Local>) -> String {
    format!("{}-{}", FILE_PREFIX, started_at.format("%Y%m%d-%H%M%S"))
}

/// Write the CSV report to `<dir>/<stem>.csv` atomically and return the path.
pub fn export_csv(engine: &ScoringEngine, dir: &Path, started_at: &DateTime<Local>) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory at {}", dir.display()))?;
    }

    let path = dir.join(format!("{}.csv", file_stem(started_at)));
    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    writeln!(file, "{}", engine.render_csv())
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save CSV export to {}", path.display()))?;

    Ok(path)
}

/// Sum the player columns of an exported CSV report.
///
/// Blank cells count as zero. The Notes column is last, so any commas in it
/// are left alone.
pub fn parse_csv_tally(csv: &str) -> Result<Vec<i64>> {
    let mut lines = csv.lines();
    let header = match lines.next() {
        Some(h) => h,
        None => bail!("CSV is empty"),
    };

    let columns = header.split(',').count();
    if columns < 3 {
        bail!("CSV header has no player columns: {}", header);
    }
    let players = columns - 2;

    let mut tally = vec![0i64; players];
    for (line_no, line) in lines.enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.splitn(columns, ',').collect();
        if fields.len() < players + 1 {
            bail!("CSV row {} has {} fields, expected {}", line_no + 1, fields.len(), columns);
        }
        for (total, field) in tally.iter_mut().zip(&fields[1..=players]) {
            let field = field.trim();
            if !field.is_empty() {
                *total += field
                    .parse::<i64>()
                    .with_context(|| format!("CSV row {}: invalid score '{}'", line_no + 1, field))?;
            }
        }
    }

    Ok(tally)
}
