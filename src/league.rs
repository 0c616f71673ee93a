use serde::{Deserialize, Serialize};

/// Points handed out by every resolved match, split between the two sides.
pub const MATCH_POINTS: u32 = 5;

/// Highest set count either side can hold in a single match.
pub const MAX_SETS: u8 = 4;

/// Score recorded for a historical match whose score is missing or unreadable.
///
/// The match still counts towards both teams' aggregates, as a narrow home win.
pub const NEUTRAL_PLACEHOLDER: (u8, u8) = (3, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    Recorded,
    Placeholder,
}

/// A played match, as listed in the historical results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub home: String,
    pub away: String,
    pub home_sets: u8,
    pub away_sets: u8,
    pub source: ScoreSource,
}

impl MatchResult {
    /// A set count above [`MAX_SETS`] is treated like an unreadable score and
    /// the result becomes a [`NEUTRAL_PLACEHOLDER`].
    pub fn new(home: impl Into<String>, away: impl Into<String>, home_sets: u8, away_sets: u8) -> Self {
        let (home, away) = (home.into(), away.into());
        if home_sets > MAX_SETS || away_sets > MAX_SETS {
            log::warn!("{home} vs {away}: score {home_sets}-{away_sets} out of range");
            return Self::placeholder(home, away);
        }
        Self {
            home,
            away,
            home_sets,
            away_sets,
            source: ScoreSource::Recorded,
        }
    }

    /// Builds a result from a raw `"H-A"` score cell. Empty, missing or
    /// malformed cells fall back to [`NEUTRAL_PLACEHOLDER`].
    pub fn from_score_cell(home: impl Into<String>, away: impl Into<String>, raw: Option<&str>) -> Self {
        match raw.and_then(parse_score) {
            Some((home_sets, away_sets)) => Self::new(home, away, home_sets, away_sets),
            None => Self::placeholder(home.into(), away.into()),
        }
    }

    fn placeholder(home: String, away: String) -> Self {
        let (home_sets, away_sets) = NEUTRAL_PLACEHOLDER;
        Self {
            home,
            away,
            home_sets,
            away_sets,
            source: ScoreSource::Placeholder,
        }
    }

    pub fn home_won(&self) -> bool {
        self.home_sets > self.away_sets
    }

    /// Points earned by (home, away). The loser keeps one point per set won and
    /// the winner takes the rest, so the pair always sums to [`MATCH_POINTS`].
    ///
    /// A level score cannot come from a real match; the away side is credited
    /// with the win in that case.
    pub fn point_split(&self) -> (u32, u32) {
        if self.home_won() {
            let loser = u32::from(self.away_sets);
            (MATCH_POINTS - loser, loser)
        } else {
            let loser = u32::from(self.home_sets);
            (loser, MATCH_POINTS - loser)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == ScoreSource::Placeholder
    }
}

/// An unplayed match between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }
}

/// Parses a `"H-A"` set score such as `"3-1"`. Whitespace around either number
/// is ignored; anything outside `0..=4` is rejected.
pub fn parse_score(raw: &str) -> Option<(u8, u8)> {
    let (h, a) = raw.trim().split_once('-')?;
    let h = h.trim().parse::<u8>().ok()?;
    let a = a.trim().parse::<u8>().ok()?;
    if h > MAX_SETS || a > MAX_SETS {
        return None;
    }
    Some((h, a))
}
