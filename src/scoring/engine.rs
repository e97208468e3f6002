use super::error::ScoringError;
use super::roster::{PlayerIndex, Roster};
use super::table::{FanScoreTable, TableUpdate};

/// How a round was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinKind {
    /// Unfed win; every opponent pays.
    SelfDraw,
    /// Win off a discard; the loser alone pays.
    Fed { loser: PlayerIndex },
    /// Self-draw off a gong; the liable player pays on behalf of everyone.
    SelfDrawOffGong { liable: PlayerIndex },
}

/// One ledger entry. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub winner: PlayerIndex,
    pub fan: u32,
    pub kind: WinKind,
}

impl RoundResult {
    /// The player who pays alone, if any
    pub fn loser(&self) -> Option<PlayerIndex> {
        match self.kind {
            WinKind::SelfDraw => None,
            WinKind::Fed { loser } => Some(loser),
            WinKind::SelfDrawOffGong { liable } => Some(liable),
        }
    }
}

/// Per-player point deltas for a single round. Always sums to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    deltas: Vec<i64>,
}

impl ScoreRow {
    /// The winner is credited with exactly what the payers are debited.
    fn from_payments(
        player_count: usize,
        winner: PlayerIndex,
        payments: impl IntoIterator<Item = (PlayerIndex, i64)>,
    ) -> Self {
        let mut deltas = vec![0; player_count];
        for (payer, amount) in payments {
            deltas[payer] -= amount;
            deltas[winner] += amount;
        }
        Self { deltas }
    }

    pub fn deltas(&self) -> &[i64] {
        &self.deltas
    }

    pub fn get(&self, player: PlayerIndex) -> i64 {
        self.deltas.get(player).copied().unwrap_or(0)
    }
}

/// Non-fatal conditions reported alongside a recorded round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    AtOrAboveMaximumFan { max: u32 },
}

/// What `record_result` hands back for display. Not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    /// 1-based round number
    pub round: usize,
    pub description: String,
    pub tally: Vec<i64>,
    pub advisory: Option<Advisory>,
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    result: RoundResult,
    scores: ScoreRow,
}

/// A recorded round as seen by reports
#[derive(Debug, Clone, Copy)]
pub struct RoundView<'a> {
    /// 1-based round number
    pub number: usize,
    pub result: &'a RoundResult,
    pub scores: &'a ScoreRow,
}

/// Owns the roster, fan table and the ledger of rounds.
///
/// Each ledger entry pairs a [`RoundResult`] with its [`ScoreRow`], so results
/// and score rows are always appended and removed together.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    roster: Roster,
    fan_table: FanScoreTable,
    ledger: Vec<LedgerEntry>,
}

impl ScoringEngine {
    /// Create an engine with an empty fan table.
    pub fn new(player_count: usize, player_names: Vec<String>) -> Result<Self, ScoringError> {
        Self::with_fan_table(player_count, player_names, FanScoreTable::new())
    }

    pub fn with_fan_table(
        player_count: usize,
        player_names: Vec<String>,
        fan_table: FanScoreTable,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            roster: Roster::new(player_count, player_names)?,
            fan_table,
            ledger: Vec::new(),
        })
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    pub fn player_names(&self) -> &[String] {
        self.roster.names()
    }

    /// Exact-match lookup. Callers uppercase typed initials first.
    pub fn player_index(&self, name: &str) -> Option<PlayerIndex> {
        self.roster.index_of(name)
    }

    pub fn fan_table(&self) -> &FanScoreTable {
        &self.fan_table
    }

    pub fn configure_fan_score(&mut self, fan: u32, value: u32) -> Result<TableUpdate, ScoringError> {
        if fan == 0 {
            return Err(ScoringError::InvalidFanValue(fan.to_string()));
        }
        if value == 0 {
            return Err(ScoringError::InvalidFanValue(value.to_string()));
        }
        Ok(self.fan_table.set(fan, value))
    }

    /// Reinstall the built-in schedule. Returns true if entries were cleared.
    pub fn reset_fan_table(&mut self) -> bool {
        self.fan_table.reset_to_defaults()
    }

    pub fn round_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn rounds(&self) -> impl Iterator<Item = RoundView<'_>> {
        self.ledger.iter().enumerate().map(|(i, entry)| RoundView {
            number: i + 1,
            result: &entry.result,
            scores: &entry.scores,
        })
    }

    /// Record a round.
    ///
    /// Fed wins pay the table value. Self-draws are worth half the table value
    /// from each opponent (rounded down), so the winner collects
    /// `(player_count - 1) * value / 2`. A self-draw off a gong is scored like a
    /// self-draw but the liable player pays the whole amount.
    ///
    /// Nothing is recorded on error.
    pub fn record_result(
        &mut self,
        winner: PlayerIndex,
        fan: u32,
        kind: WinKind,
    ) -> Result<RoundSummary, ScoringError> {
        let player_count = self.player_count();
        let winner_name = self.checked_name(winner)?.to_string();
        if fan == 0 {
            return Err(ScoringError::InvalidFanValue(fan.to_string()));
        }
        let result = RoundResult { winner, fan, kind };
        if let Some(loser) = result.loser() {
            self.checked_name(loser)?;
            if loser == winner {
                return Err(ScoringError::LoserIsWinner(winner_name));
            }
        }

        let base = i64::from(self.fan_table.lookup(fan));
        let per_payer = match kind {
            WinKind::Fed { .. } => base,
            WinKind::SelfDraw | WinKind::SelfDrawOffGong { .. } => base / 2,
        };
        if per_payer == 0 {
            return Err(ScoringError::BelowMinimumFan(fan));
        }

        let advisory = self
            .fan_table
            .max_threshold()
            .filter(|max| fan >= *max)
            .map(|max| Advisory::AtOrAboveMaximumFan { max });

        let opponents = player_count as i64 - 1;
        let scores = match kind {
            WinKind::Fed { loser } => {
                ScoreRow::from_payments(player_count, winner, [(loser, per_payer)])
            }
            WinKind::SelfDraw => ScoreRow::from_payments(
                player_count,
                winner,
                (0..player_count)
                    .filter(|p| *p != winner)
                    .map(|p| (p, per_payer)),
            ),
            WinKind::SelfDrawOffGong { liable } => {
                ScoreRow::from_payments(player_count, winner, [(liable, opponents * per_payer)])
            }
        };

        let description = self.describe(&result, &scores);
        self.ledger.push(LedgerEntry { result, scores });

        Ok(RoundSummary {
            round: self.ledger.len(),
            description,
            tally: self.tally(),
            advisory,
        })
    }

    /// Remove the round at 1-based position `round`.
    pub fn remove_round(&mut self, round: usize) -> Result<RoundResult, ScoringError> {
        if round == 0 || round > self.ledger.len() {
            return Err(ScoringError::InvalidRoundIndex(round));
        }
        Ok(self.ledger.remove(round - 1).result)
    }

    pub fn delete_round(&mut self, round: usize) -> bool {
        self.remove_round(round).is_ok()
    }

    pub fn delete_last(&mut self) -> bool {
        self.delete_round(self.ledger.len())
    }

    /// Column-wise sum of every score row
    pub fn tally(&self) -> Vec<i64> {
        let mut totals = vec![0; self.player_count()];
        for entry in &self.ledger {
            for (total, delta) in totals.iter_mut().zip(entry.scores.deltas()) {
                *total += delta;
            }
        }
        totals
    }

    /// Human-readable line for a round, derived from what was recorded so
    /// later fan table edits do not rewrite it.
    pub fn describe(&self, result: &RoundResult, scores: &ScoreRow) -> String {
        let winner = self.roster.name(result.winner).unwrap_or("?");
        let won = scores.get(result.winner);
        match result.kind {
            WinKind::Fed { loser } => format!(
                "{} wins {} fan from {} ({}).",
                winner,
                result.fan,
                self.roster.name(loser).unwrap_or("?"),
                won
            ),
            WinKind::SelfDraw => {
                let opponents = (self.player_count() as i64 - 1).max(1);
                format!(
                    "{} wins {} fan by self draw ({} from all).",
                    winner,
                    result.fan,
                    won / opponents
                )
            }
            WinKind::SelfDrawOffGong { liable } => {
                let liable = self.roster.name(liable).unwrap_or("?");
                format!(
                    "{} wins {} fan by self draw off {}'s gong ({} from {}).",
                    winner, result.fan, liable, won, liable
                )
            }
        }
    }

    pub fn render_table(&self) -> String {
        crate::output::render_table(self)
    }

    pub fn render_csv(&self) -> String {
        crate::output::render_csv(self)
    }

    fn checked_name(&self, player: PlayerIndex) -> Result<&str, ScoringError> {
        self.roster
            .name(player)
            .ok_or_else(|| ScoringError::UnknownPlayer(format!("#{}", player + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_players() -> ScoringEngine {
        let names = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        ScoringEngine::with_fan_table(4, names, FanScoreTable::with_defaults()).unwrap()
    }

    #[test]
    fn test_fed_win() {
        let mut engine = four_players();
        let summary = engine
            .record_result(0, 7, WinKind::Fed { loser: 1 })
            .unwrap();

        assert_eq!(summary.round, 1);
        assert_eq!(summary.tally, vec![128, -128, 0, 0]);
        assert_eq!(summary.description, "A wins 7 fan from B (128).");
        assert_eq!(summary.advisory, None);
    }

    #[test]
    fn test_self_draw_pays_half_from_each_opponent() {
        let mut engine = four_players();
        let summary = engine.record_result(0, 7, WinKind::SelfDraw).unwrap();

        assert_eq!(summary.tally, vec![192, -64, -64, -64]);
        assert_eq!(summary.tally.iter().sum::<i64>(), 0);
        assert_eq!(summary.description, "A wins 7 fan by self draw (64 from all).");
    }

    #[test]
    fn test_self_draw_three_players_is_zero_sum() {
        let names = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let mut engine =
            ScoringEngine::with_fan_table(3, names, FanScoreTable::with_defaults()).unwrap();
        let summary = engine.record_result(2, 3, WinKind::SelfDraw).unwrap();
        assert_eq!(summary.tally, vec![-16, -16, 32]);
    }

    #[test]
    fn test_self_draw_off_gong_liable_pays_all() {
        let mut engine = four_players();
        let summary = engine
            .record_result(1, 8, WinKind::SelfDrawOffGong { liable: 3 })
            .unwrap();

        assert_eq!(summary.tally, vec![0, 288, 0, -288]);
        assert_eq!(
            summary.description,
            "B wins 8 fan by self draw off D's gong (288 from D)."
        );
    }

    #[test]
    fn test_below_minimum_fan_leaves_ledger_untouched() {
        let mut engine = four_players();
        engine.record_result(0, 3, WinKind::SelfDraw).unwrap();

        let result = engine.record_result(0, 2, WinKind::Fed { loser: 1 });
        assert_eq!(result, Err(ScoringError::BelowMinimumFan(2)));
        assert_eq!(engine.round_count(), 1);
        assert_eq!(engine.tally(), vec![48, -16, -16, -16]);
    }

    #[test]
    fn test_self_draw_rounding_to_zero_is_below_minimum() {
        let names = ["A", "B"].iter().map(|s| s.to_string()).collect();
        let mut engine = ScoringEngine::new(2, names).unwrap();
        engine.configure_fan_score(1, 1).unwrap();

        assert!(engine.record_result(0, 1, WinKind::Fed { loser: 1 }).is_ok());
        assert_eq!(
            engine.record_result(0, 1, WinKind::SelfDraw),
            Err(ScoringError::BelowMinimumFan(1))
        );
        assert_eq!(engine.round_count(), 1);
    }

    #[test]
    fn test_empty_table_rejects_every_result() {
        let names = ["A", "B"].iter().map(|s| s.to_string()).collect();
        let mut engine = ScoringEngine::new(2, names).unwrap();
        assert_eq!(
            engine.record_result(0, 13, WinKind::Fed { loser: 1 }),
            Err(ScoringError::BelowMinimumFan(13))
        );
    }

    #[test]
    fn test_advisory_at_maximum_fan() {
        let mut engine = four_players();
        let at_max = engine.record_result(0, 13, WinKind::SelfDraw).unwrap();
        assert_eq!(
            at_max.advisory,
            Some(Advisory::AtOrAboveMaximumFan { max: 13 })
        );

        let above_max = engine
            .record_result(0, 20, WinKind::Fed { loser: 2 })
            .unwrap();
        assert_eq!(above_max.tally[2], -1536);
        let round = engine.rounds().last().unwrap();
        assert_eq!(round.scores.get(2), -1024);
        assert!(above_max.advisory.is_some());
    }

    #[test]
    fn test_round_result_loser() {
        let fed = RoundResult { winner: 0, fan: 7, kind: WinKind::Fed { loser: 2 } };
        let gong = RoundResult { winner: 1, fan: 8, kind: WinKind::SelfDrawOffGong { liable: 3 } };
        let self_draw = RoundResult { winner: 0, fan: 7, kind: WinKind::SelfDraw };
        assert_eq!(fed.loser(), Some(2));
        assert_eq!(gong.loser(), Some(3));
        assert_eq!(self_draw.loser(), None);
    }

    #[test]
    fn test_gong_liable_cannot_be_winner() {
        let mut engine = four_players();
        assert_eq!(
            engine.record_result(1, 8, WinKind::SelfDrawOffGong { liable: 1 }),
            Err(ScoringError::LoserIsWinner("B".to_string()))
        );
        assert_eq!(engine.round_count(), 0);
    }

    #[test]
    fn test_invalid_players_rejected() {
        let mut engine = four_players();
        assert!(matches!(
            engine.record_result(4, 7, WinKind::SelfDraw),
            Err(ScoringError::UnknownPlayer(_))
        ));
        assert!(matches!(
            engine.record_result(0, 7, WinKind::Fed { loser: 9 }),
            Err(ScoringError::UnknownPlayer(_))
        ));
        assert_eq!(
            engine.record_result(0, 7, WinKind::Fed { loser: 0 }),
            Err(ScoringError::LoserIsWinner("A".to_string()))
        );
        assert_eq!(
            engine.record_result(0, 0, WinKind::SelfDraw),
            Err(ScoringError::InvalidFanValue("0".to_string()))
        );
        assert_eq!(engine.round_count(), 0);
    }

    #[test]
    fn test_delete_round_bounds() {
        let mut engine = four_players();
        assert!(!engine.delete_last());
        assert!(!engine.delete_round(1));

        engine.record_result(0, 7, WinKind::SelfDraw).unwrap();
        engine.record_result(1, 5, WinKind::Fed { loser: 2 }).unwrap();

        assert!(!engine.delete_round(0));
        assert!(!engine.delete_round(3));
        assert_eq!(engine.round_count(), 2);
        assert_eq!(
            engine.remove_round(3),
            Err(ScoringError::InvalidRoundIndex(3))
        );
    }

    #[test]
    fn test_delete_middle_round_matches_skipping_it() {
        let mut engine = four_players();
        engine.record_result(0, 7, WinKind::SelfDraw).unwrap();
        engine.record_result(1, 5, WinKind::Fed { loser: 2 }).unwrap();
        engine.record_result(3, 9, WinKind::Fed { loser: 0 }).unwrap();

        let mut skipped = four_players();
        skipped.record_result(0, 7, WinKind::SelfDraw).unwrap();
        skipped.record_result(3, 9, WinKind::Fed { loser: 0 }).unwrap();

        let removed = engine.remove_round(2).unwrap();
        assert_eq!(removed.winner, 1);
        assert_eq!(engine.tally(), skipped.tally());
        assert_eq!(engine.round_count(), 2);
    }

    #[test]
    fn test_delete_last() {
        let mut engine = four_players();
        engine.record_result(0, 7, WinKind::SelfDraw).unwrap();
        engine.record_result(1, 5, WinKind::Fed { loser: 2 }).unwrap();

        assert!(engine.delete_last());
        assert_eq!(engine.tally(), vec![192, -64, -64, -64]);
        assert!(engine.delete_last());
        assert_eq!(engine.tally(), vec![0, 0, 0, 0]);
        assert!(!engine.delete_last());
    }

    #[test]
    fn test_descriptions_survive_fan_table_edits() {
        let mut engine = four_players();
        engine.record_result(0, 7, WinKind::Fed { loser: 1 }).unwrap();
        engine.configure_fan_score(7, 1000).unwrap();

        let round = engine.rounds().next().unwrap();
        assert_eq!(
            engine.describe(round.result, round.scores),
            "A wins 7 fan from B (128)."
        );
    }

    #[test]
    fn test_configure_fan_score() {
        let mut engine = four_players();
        assert_eq!(
            engine.configure_fan_score(14, 1536),
            Ok(TableUpdate::Inserted)
        );
        assert_eq!(
            engine.configure_fan_score(3, 40),
            Ok(TableUpdate::Replaced { previous: 32 })
        );
        assert!(engine.configure_fan_score(0, 40).is_err());
        assert!(engine.configure_fan_score(4, 0).is_err());
        assert!(engine.reset_fan_table());
        assert_eq!(engine.fan_table().lookup(3), 32);
    }

    #[test]
    fn test_tally_empty_ledger() {
        let engine = four_players();
        assert_eq!(engine.tally(), vec![0, 0, 0, 0]);
    }
}
