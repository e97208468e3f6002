pub mod export;
pub mod formatter;

pub use export::{export_csv, file_stem, parse_csv_tally};
pub use formatter::{
    format_fan_table, format_tally, render_csv, render_table, should_use_colors,
};
