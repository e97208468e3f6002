use std::collections::BTreeMap;

use super::error::ScoringError;

/// Built-in schedule installed by [`FanScoreTable::reset_to_defaults`].
pub const DEFAULT_FAN_SCORES: [(u32, u32); 11] = [
    (3, 32),
    (4, 48),
    (5, 64),
    (6, 96),
    (7, 128),
    (8, 192),
    (9, 256),
    (10, 384),
    (11, 512),
    (12, 768),
    (13, 1024),
];

/// Outcome of [`FanScoreTable::set`], for caller-side messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableUpdate {
    Inserted,
    Replaced { previous: u32 },
}

/// Step function from fan count to points.
///
/// A query resolves to the value of the greatest threshold not above it, or 0
/// when every threshold is larger (or the table is empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanScoreTable {
    entries: BTreeMap<u32, u32>,
}

impl FanScoreTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the built-in schedule
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.reset_to_defaults();
        table
    }

    /// Insert or overwrite the score for `threshold`.
    pub fn set(&mut self, threshold: u32, value: u32) -> TableUpdate {
        match self.entries.insert(threshold, value) {
            Some(previous) => TableUpdate::Replaced { previous },
            None => TableUpdate::Inserted,
        }
    }

    pub fn lookup(&self, fan: u32) -> u32 {
        self.entries
            .range(..=fan)
            .next_back()
            .map(|(_, value)| *value)
            .unwrap_or(0)
    }

    pub fn max_threshold(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    /// Clear the table and install [`DEFAULT_FAN_SCORES`].
    /// Returns true if existing entries were cleared.
    pub fn reset_to_defaults(&mut self) -> bool {
        let cleared = !self.entries.is_empty();
        self.entries = DEFAULT_FAN_SCORES.iter().copied().collect();
        cleared
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending threshold order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().map(|(fan, score)| (*fan, *score))
    }
}

/// Parse a typed fan or score value; must be a positive integer.
pub fn parse_positive(input: &str) -> Result<u32, ScoringError> {
    match input.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ScoringError::InvalidFanValue(input.to_string())),
    }
}

impl FromIterator<(u32, u32)> for FanScoreTable {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_resolves_to_zero() {
        let table = FanScoreTable::new();
        assert_eq!(table.lookup(0), 0);
        assert_eq!(table.lookup(13), 0);
        assert_eq!(table.max_threshold(), None);
    }

    #[test]
    fn test_default_schedule() {
        let table = FanScoreTable::with_defaults();
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup(3), 32);
        assert_eq!(table.lookup(7), 128);
        assert_eq!(table.lookup(13), 1024);
        assert_eq!(table.max_threshold(), Some(13));
    }

    #[test]
    fn test_lookup_below_minimum() {
        let table = FanScoreTable::with_defaults();
        assert_eq!(table.lookup(2), 0);
        assert_eq!(table.lookup(0), 0);
    }

    #[test]
    fn test_lookup_above_maximum_uses_top_step() {
        let table = FanScoreTable::with_defaults();
        assert_eq!(table.lookup(20), 1024);
    }

    #[test]
    fn test_lookup_between_thresholds_uses_floor() {
        let table: FanScoreTable = [(3, 10), (8, 100)].into_iter().collect();
        assert_eq!(table.lookup(5), 10);
        assert_eq!(table.lookup(7), 10);
        assert_eq!(table.lookup(8), 100);
    }

    #[test]
    fn test_set_reports_insert_then_replace() {
        let mut table = FanScoreTable::new();
        assert_eq!(table.set(5, 64), TableUpdate::Inserted);
        assert_eq!(table.set(5, 80), TableUpdate::Replaced { previous: 64 });
        assert_eq!(table.lookup(5), 80);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reset_reports_clearing() {
        let mut table = FanScoreTable::new();
        assert!(!table.reset_to_defaults());

        table.set(1, 1);
        table.set(20, 5000);
        assert!(table.reset_to_defaults());
        assert_eq!(table.lookup(1), 0);
        assert_eq!(table.max_threshold(), Some(13));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("7"), Ok(7));
        assert_eq!(parse_positive(" 12 "), Ok(12));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-3").is_err());
        assert_eq!(
            parse_positive("seven"),
            Err(ScoringError::InvalidFanValue("seven".to_string()))
        );
    }

    #[test]
    fn test_iter_is_ascending() {
        let table: FanScoreTable = [(9, 1), (3, 2), (5, 3)].into_iter().collect();
        let fans: Vec<u32> = table.iter().map(|(fan, _)| fan).collect();
        assert_eq!(fans, vec![3, 5, 9]);
    }
}
