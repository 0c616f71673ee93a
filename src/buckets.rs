use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::league::MATCH_POINTS;

/// The six canonical match scores a prediction is rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    #[serde(rename = "4-0")]
    FourNil,
    #[serde(rename = "3-1")]
    ThreeOne,
    #[serde(rename = "3-2")]
    ThreeTwo,
    #[serde(rename = "2-3")]
    TwoThree,
    #[serde(rename = "1-3")]
    OneThree,
    #[serde(rename = "0-4")]
    NilFour,
}

impl ScoreLabel {
    pub const ALL: [ScoreLabel; 6] = [
        ScoreLabel::FourNil,
        ScoreLabel::ThreeOne,
        ScoreLabel::ThreeTwo,
        ScoreLabel::TwoThree,
        ScoreLabel::OneThree,
        ScoreLabel::NilFour,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::FourNil => "4-0",
            ScoreLabel::ThreeOne => "3-1",
            ScoreLabel::ThreeTwo => "3-2",
            ScoreLabel::TwoThree => "2-3",
            ScoreLabel::OneThree => "1-3",
            ScoreLabel::NilFour => "0-4",
        }
    }

    /// Sets won by (home, away) as written in the label.
    pub fn sets(self) -> (u8, u8) {
        match self {
            ScoreLabel::FourNil => (4, 0),
            ScoreLabel::ThreeOne => (3, 1),
            ScoreLabel::ThreeTwo => (3, 2),
            ScoreLabel::TwoThree => (2, 3),
            ScoreLabel::OneThree => (1, 3),
            ScoreLabel::NilFour => (0, 4),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|label| label.as_str() == raw)
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A score label together with the points each side is awarded for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub label: ScoreLabel,
    pub home_points: u32,
    pub away_points: u32,
}

impl Award {
    pub const fn new(label: ScoreLabel, home_points: u32, away_points: u32) -> Self {
        Self {
            label,
            home_points,
            away_points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBucket {
    /// Lowest chance (inclusive) that lands in this bucket.
    pub min_chance: f64,
    #[serde(flatten)]
    pub award: Award,
}

impl ScoreBucket {
    pub const fn new(min_chance: f64, label: ScoreLabel, home_points: u32, away_points: u32) -> Self {
        Self {
            min_chance,
            award: Award::new(label, home_points, away_points),
        }
    }
}

// `1-3` awards (2, 3), the same pair as `2-3`. Kept as observed; swap in a
// corrected table through `BUCKET_TABLE_PATH` rather than editing this one.
const DEFAULT_BUCKETS: [ScoreBucket; 6] = [
    ScoreBucket::new(0.75, ScoreLabel::FourNil, 4, 0),
    ScoreBucket::new(0.60, ScoreLabel::ThreeOne, 3, 1),
    ScoreBucket::new(0.55, ScoreLabel::ThreeTwo, 3, 2),
    ScoreBucket::new(0.45, ScoreLabel::TwoThree, 2, 3),
    ScoreBucket::new(0.40, ScoreLabel::OneThree, 2, 3),
    ScoreBucket::new(0.25, ScoreLabel::NilFour, 0, 4),
];

const DEFAULT_FALLBACK: Award = Award::new(ScoreLabel::NilFour, 0, 4);

/// Threshold table mapping a home-win chance to a score. Buckets are checked
/// in order and the first one whose `min_chance` the chance reaches wins;
/// anything below every threshold (NaN included) gets `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTable {
    pub buckets: Vec<ScoreBucket>,
    pub fallback: Award,
}

impl Default for BucketTable {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS.to_vec(),
            fallback: DEFAULT_FALLBACK,
        }
    }
}

impl BucketTable {
    pub fn map(&self, chance: f64) -> Award {
        map_chance(&self.buckets, self.fallback, chance)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buckets.is_empty() {
            return Err(anyhow!("bucket table has no buckets"));
        }
        for (idx, bucket) in self.buckets.iter().enumerate() {
            if !bucket.min_chance.is_finite() {
                return Err(anyhow!("bucket {idx} ({}) has a non-finite threshold", bucket.award.label));
            }
            check_points(&bucket.award).with_context(|| format!("bucket {idx}"))?;
        }
        for pair in self.buckets.windows(2) {
            if pair[1].min_chance >= pair[0].min_chance {
                return Err(anyhow!(
                    "bucket thresholds must be strictly descending ({} then {})",
                    pair[0].min_chance,
                    pair[1].min_chance
                ));
            }
        }
        check_points(&self.fallback).context("fallback bucket")?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read bucket table {}", path.display()))?;
        let table: BucketTable = serde_json::from_str(&raw)
            .with_context(|| format!("parse bucket table {}", path.display()))?;
        table
            .validate()
            .with_context(|| format!("invalid bucket table {}", path.display()))?;
        Ok(table)
    }
}

/// Maps a chance through the built-in table. Defined for every input.
pub fn prob_mapping(chance: f64) -> Award {
    map_chance(&DEFAULT_BUCKETS, DEFAULT_FALLBACK, chance)
}

fn map_chance(buckets: &[ScoreBucket], fallback: Award, chance: f64) -> Award {
    buckets
        .iter()
        .find(|b| chance >= b.min_chance)
        .map(|b| b.award)
        .unwrap_or(fallback)
}

fn check_points(award: &Award) -> Result<()> {
    let total = award.home_points + award.away_points;
    if total > MATCH_POINTS {
        return Err(anyhow!(
            "{} awards {}+{} points, more than the {MATCH_POINTS} a match hands out",
            award.label,
            award.home_points,
            award.away_points
        ));
    }
    Ok(())
}
