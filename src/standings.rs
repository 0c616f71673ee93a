use std::collections::HashMap;

use serde::Serialize;

use crate::predict::PredictedOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandingsEntry {
    pub team: String,
    pub matches_played: u32,
    pub points: u32,
    pub sets_for: u32,
    pub sets_against: u32,
    pub points_for: u32,
    pub points_against: u32,
}

impl StandingsEntry {
    pub fn new(team: impl Into<String>, points: u32) -> Self {
        Self {
            team: team.into(),
            points,
            ..Self::default()
        }
    }

    fn record(&mut self, points: u32, sets_for: u8, sets_against: u8) {
        self.matches_played += 1;
        self.points += points;
        self.sets_for += u32::from(sets_for);
        self.sets_against += u32::from(sets_against);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub outcomes_applied: usize,
    pub sides_applied: usize,
    pub sides_skipped: usize,
    pub points_awarded: u64,
    pub unknown_teams: Vec<String>,
}

/// The current league table, keyed by team but kept in load order so that
/// teams level on points stay in the order they were read.
#[derive(Debug, Clone, Default)]
pub struct StandingsTable {
    entries: Vec<StandingsEntry>,
    index: HashMap<String, usize>,
}

impl StandingsTable {
    /// Builds the table from rows in input order. A repeated team keeps its
    /// first row.
    pub fn from_entries(rows: impl IntoIterator<Item = StandingsEntry>) -> Self {
        let mut table = Self::default();
        for row in rows {
            if table.index.contains_key(&row.team) {
                log::warn!("duplicate standings row for '{}', keeping the first", row.team);
                continue;
            }
            table.index.insert(row.team.clone(), table.entries.len());
            table.entries.push(row);
        }
        table
    }

    pub fn get(&self, team: &str) -> Option<&StandingsEntry> {
        self.index.get(team).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[StandingsEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_points(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.points)).sum()
    }

    /// Adds one predicted result to both sides. Returns how many sides were
    /// found in the table; an unknown team is left out without creating a row.
    pub fn apply(&mut self, outcome: &PredictedOutcome, report: &mut SimulationReport) -> usize {
        let (home_sets, away_sets) = outcome.label.sets();
        let sides = [
            (&outcome.home, outcome.home_points, home_sets, away_sets),
            (&outcome.away, outcome.away_points, away_sets, home_sets),
        ];

        let mut applied = 0;
        for (team, points, sets_for, sets_against) in sides {
            match self.index.get(team.as_str()) {
                Some(&idx) => {
                    self.entries[idx].record(points, sets_for, sets_against);
                    report.points_awarded += u64::from(points);
                    applied += 1;
                }
                None => {
                    log::warn!(
                        "{} vs {}: '{}' is not in the standings, skipping its {} points",
                        outcome.home,
                        outcome.away,
                        team,
                        points
                    );
                    if !report.unknown_teams.contains(team) {
                        report.unknown_teams.push(team.clone());
                    }
                    report.sides_skipped += 1;
                }
            }
        }
        report.sides_applied += applied;
        if applied > 0 {
            report.outcomes_applied += 1;
        }
        applied
    }

    pub fn apply_outcomes(&mut self, outcomes: &[PredictedOutcome]) -> SimulationReport {
        let mut report = SimulationReport::default();
        for outcome in outcomes {
            self.apply(outcome, &mut report);
        }
        report
    }

    /// Entries by points, highest first. The sort is stable.
    pub fn ranked(&self) -> Vec<StandingsEntry> {
        let mut out = self.entries.clone();
        out.sort_by(|a, b| b.points.cmp(&a.points));
        out
    }
}

/// Applies every predicted outcome to the table and returns the re-ranked rows.
pub fn simulate_standings(
    table: &mut StandingsTable,
    outcomes: &[PredictedOutcome],
) -> (Vec<StandingsEntry>, SimulationReport) {
    let before = table.total_points();
    let report = table.apply_outcomes(outcomes);
    log::info!(
        "applied {} of {} predicted results ({} sides skipped), table points {} -> {}",
        report.outcomes_applied,
        outcomes.len(),
        report.sides_skipped,
        before,
        table.total_points()
    );
    (table.ranked(), report)
}
