use serde::Serialize;

use crate::aggregate::{Aggregates, TeamAggregate};
use crate::buckets::{BucketTable, ScoreLabel};
use crate::league::Fixture;

const COIN_FLIP: f64 = 0.5;

/// Which rule produced the chance behind a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChanceTier {
    /// The teams have met before; their mutual points decide.
    HeadToHead,
    /// No meetings; season point totals decide.
    TotalPoints,
    /// Neither meetings nor points to go on.
    CoinFlip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedOutcome {
    pub home: String,
    pub away: String,
    pub label: ScoreLabel,
    pub home_points: u32,
    pub away_points: u32,
    pub chance: f64,
    pub tier: ChanceTier,
}

/// Home side's chance of winning the fixture, in `[0, 1]`.
///
/// Mutual head-to-head points are preferred. Teams that never met fall back to
/// their overall point totals, and two teams with nothing on record get an even
/// chance. Teams absent from `aggregates` count as having no record.
pub fn home_chance(aggregates: &Aggregates, home: &str, away: &str) -> (f64, ChanceTier) {
    let empty = TeamAggregate::default();
    let h = aggregates.get(home).unwrap_or(&empty);
    let a = aggregates.get(away).unwrap_or(&empty);

    if let Some(chance) = normalized_advantage(h.points_against(away), a.points_against(home)) {
        return (chance, ChanceTier::HeadToHead);
    }
    match normalized_advantage(h.total_points, a.total_points) {
        Some(chance) => (chance, ChanceTier::TotalPoints),
        None => (COIN_FLIP, ChanceTier::CoinFlip),
    }
}

/// `((ours - theirs) / (ours + theirs)) * 0.5 + 0.5`, or `None` when both are zero.
fn normalized_advantage(ours: u32, theirs: u32) -> Option<f64> {
    let total = ours + theirs;
    if total == 0 {
        return None;
    }
    let diff = f64::from(ours) - f64::from(theirs);
    Some((diff / f64::from(total)) * 0.5 + 0.5)
}

pub fn predict_fixture(aggregates: &Aggregates, table: &BucketTable, fixture: &Fixture) -> PredictedOutcome {
    let (chance, tier) = home_chance(aggregates, &fixture.home, &fixture.away);
    let award = table.map(chance);
    PredictedOutcome {
        home: fixture.home.clone(),
        away: fixture.away.clone(),
        label: award.label,
        home_points: award.home_points,
        away_points: award.away_points,
        chance,
        tier,
    }
}

/// Predicts every fixture against the same aggregate snapshot. The output has
/// one entry per fixture, in fixture order.
pub fn predict_outcomes(
    aggregates: &Aggregates,
    fixtures: &[Fixture],
    table: &BucketTable,
) -> Vec<PredictedOutcome> {
    let outcomes: Vec<PredictedOutcome> = fixtures
        .iter()
        .map(|f| predict_fixture(aggregates, table, f))
        .collect();

    for o in &outcomes {
        log::debug!(
            "{} vs {}: chance {:.3} via {:?} -> {} ({}/{})",
            o.home,
            o.away,
            o.chance,
            o.tier,
            o.label,
            o.home_points,
            o.away_points
        );
    }
    outcomes
}
