use std::collections::HashMap;

use crate::league::MatchResult;

/// Per-team totals built from the historical results table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAggregate {
    pub matches_played: u32,
    pub total_points: u32,
    pub wins: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    /// Points this team earned against each opponent. Not symmetric: the
    /// opponent's own entry holds the points it earned in the same meetings.
    pub head_to_head: HashMap<String, u32>,
}

impl TeamAggregate {
    pub fn points_against(&self, opponent: &str) -> u32 {
        self.head_to_head.get(opponent).copied().unwrap_or(0)
    }

    fn record(&mut self, opponent: &str, points: u32, sets_won: u8, sets_lost: u8, won: bool) {
        self.matches_played += 1;
        self.total_points += points;
        self.sets_won += u32::from(sets_won);
        self.sets_lost += u32::from(sets_lost);
        if won {
            self.wins += 1;
        }
        *self.head_to_head.entry(opponent.to_string()).or_insert(0) += points;
    }
}

pub type Aggregates = HashMap<String, TeamAggregate>;

/// Folds the historical results into one aggregate per team. Every pass starts
/// from an empty map, so the output depends only on the results given. Rows
/// where a team is listed against itself are skipped.
pub fn aggregate_results(results: &[MatchResult]) -> Aggregates {
    let aggregates = results.iter().fold(Aggregates::new(), |mut acc, m| {
        if m.home == m.away {
            log::warn!("skipping result where {} plays itself", m.home);
            return acc;
        }
        let (home_points, away_points) = m.point_split();
        let home_won = m.home_won();

        acc.entry(m.home.clone()).or_default().record(
            &m.away,
            home_points,
            m.home_sets,
            m.away_sets,
            home_won,
        );
        acc.entry(m.away.clone()).or_default().record(
            &m.home,
            away_points,
            m.away_sets,
            m.home_sets,
            !home_won,
        );
        acc
    });

    let placeholders = results.iter().filter(|m| m.is_placeholder()).count();
    log::debug!(
        "aggregated {} results into {} teams ({} placeholder scores)",
        results.len(),
        aggregates.len(),
        placeholders
    );
    aggregates
}

/// Number of times `a` and `b` met, in either home/away order.
pub fn meetings(results: &[MatchResult], a: &str, b: &str) -> usize {
    results
        .iter()
        .filter(|m| m.home != m.away)
        .filter(|m| (m.home == a && m.away == b) || (m.home == b && m.away == a))
        .count()
}
