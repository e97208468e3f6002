use std::io::IsTerminal;

use owo_colors::OwoColorize;

use crate::scoring::{FanScoreTable, ScoringEngine};

const ROUND_HEADER: &str = "Round";
const TOTAL_LABEL: &str = "Total";
const MIN_CELL_WIDTH: usize = 4;
const SEPARATOR: &str = " | ";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Zero renders blank in reports
fn cell(value: i64) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Format running totals as one "NAME: total" line per player
pub fn format_tally(names: &[String], tally: &[i64], use_colors: bool) -> String {
    names
        .iter()
        .zip(tally)
        .map(|(name, total)| {
            if !use_colors {
                format!("{}: {}", name, total)
            } else if *total > 0 {
                format!("{}: {}", name.bold(), total.green())
            } else if *total < 0 {
                format!("{}: {}", name.bold(), total.red())
            } else {
                format!("{}: {}", name.bold(), total)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the fan table as one "N fan = S" line per entry
pub fn format_fan_table(table: &FanScoreTable) -> String {
    if table.is_empty() {
        return "No fan scores configured.".to_string();
    }

    table
        .iter()
        .map(|(fan, score)| format!("{:>3} fan = {}", fan, score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed-width report: header, one line per round, then a totals line when
/// at least one round exists.
///
/// Player headers are centered, numbers right-aligned, zero cells blank.
pub fn render_table(engine: &ScoringEngine) -> String {
    let names = engine.player_names();
    let tally = engine.tally();
    let has_rounds = engine.round_count() > 0;

    let rows: Vec<(String, Vec<String>)> = engine
        .rounds()
        .map(|round| {
            let cells = round.scores.deltas().iter().map(|d| cell(*d)).collect();
            (round.number.to_string(), cells)
        })
        .collect();
    let totals: Vec<String> = tally.iter().map(|t| cell(*t)).collect();

    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .chain([ROUND_HEADER.len(), TOTAL_LABEL.len()])
        .max()
        .unwrap_or(ROUND_HEADER.len());

    // Width of each player column: fits the name and every value below it
    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|(_, cells)| cells[i].len())
                .chain([name.chars().count(), totals[i].len(), MIN_CELL_WIDTH])
                .max()
                .unwrap_or(MIN_CELL_WIDTH)
        })
        .collect();

    // Trailing blank cells are dropped along with their separators
    let line = |label: &str, cells: &[String], center: bool| -> String {
        let shown = cells
            .iter()
            .rposition(|value| !value.is_empty())
            .map_or(0, |last| last + 1);
        let mut out = format!("{:>width$}", label, width = label_width);
        for (value, width) in cells[..shown].iter().zip(&widths) {
            out.push_str(SEPARATOR);
            if center {
                out.push_str(&format!("{:^width$}", value, width = width));
            } else {
                out.push_str(&format!("{:>width$}", value, width = width));
            }
        }
        out.trim_end().to_string()
    };

    let rule = std::iter::once(label_width)
        .chain(widths.iter().copied())
        .map(|w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![line(ROUND_HEADER, names, true), rule.clone()];
    for (label, cells) in &rows {
        lines.push(line(label.as_str(), cells.as_slice(), false));
    }
    if has_rounds {
        lines.push(rule);
        lines.push(line(TOTAL_LABEL, &totals, false));
    }

    lines.join("\n")
}

/// Quote a CSV field if it contains a delimiter, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// CSV report: `Round,<names...>,Notes` then one line per round with raw
/// deltas (blank for zero) and the round description.
pub fn render_csv(engine: &ScoringEngine) -> String {
    let header = std::iter::once(ROUND_HEADER.to_string())
        .chain(engine.player_names().iter().map(|n| csv_field(n)))
        .chain(std::iter::once("Notes".to_string()))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![header];
    for round in engine.rounds() {
        let mut fields = vec![round.number.to_string()];
        fields.extend(round.scores.deltas().iter().map(|d| cell(*d)));
        fields.push(csv_field(&engine.describe(round.result, round.scores)));
        lines.push(fields.join(","));
    }

    lines.join("\n")
}
