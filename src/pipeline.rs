use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::aggregate::aggregate_results;
use crate::buckets::BucketTable;
use crate::config::{OutputFormat, RunConfig};
use crate::export;
use crate::league::{Fixture, MatchResult};
use crate::predict::{PredictedOutcome, predict_outcomes};
use crate::standings::{SimulationReport, StandingsEntry, StandingsTable, simulate_standings};
use crate::tables;

/// Everything one projection produces.
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub results_read: usize,
    pub placeholder_scores: usize,
    pub remaining_matches: usize,
    pub predictions: Vec<PredictedOutcome>,
    pub standings: Vec<StandingsEntry>,
    pub simulation: SimulationReport,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub projection: Projection,
    pub output_path: PathBuf,
}

/// Aggregate, predict, simulate. Stats are taken once from `results` and are
/// not updated as fixtures resolve.
pub fn project(
    results: &[MatchResult],
    standings: Vec<StandingsEntry>,
    fixtures: &[Fixture],
    table: &BucketTable,
) -> Projection {
    let aggregates = aggregate_results(results);
    let predictions = predict_outcomes(&aggregates, fixtures, table);
    let mut current = StandingsTable::from_entries(standings);
    let (ranked, simulation) = simulate_standings(&mut current, &predictions);

    Projection {
        results_read: results.len(),
        placeholder_scores: results.iter().filter(|r| r.is_placeholder()).count(),
        remaining_matches: fixtures.len(),
        predictions,
        standings: ranked,
        simulation,
    }
}

pub fn run(config: &RunConfig) -> Result<RunReport> {
    let table = match &config.bucket_table_path {
        Some(path) => BucketTable::load(path)?,
        None => BucketTable::default(),
    };
    let standings = tables::load_standings(&config.standings_path)?;
    let results = tables::load_results(&config.results_path)?;
    let fixtures = tables::load_fixtures(&config.fixtures_path)?;
    log::info!(
        "loaded {} teams, {} results, {} fixtures",
        standings.len(),
        results.len(),
        fixtures.len()
    );

    let projection = project(&results, standings, &fixtures, &table);
    if projection.placeholder_scores > 0 {
        log::info!(
            "{} historical results had no readable score and were counted as 3-2",
            projection.placeholder_scores
        );
    }

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("create output dir {}", config.output_dir.display()))?;
    let output_path = config.output_path(projection.remaining_matches);
    match config.format {
        OutputFormat::Csv => tables::save_standings_csv(&output_path, &projection.standings)?,
        OutputFormat::Xlsx => export::save_workbook(&output_path, &projection)?,
        OutputFormat::Json => export::save_summary_json(&output_path, &projection)?,
    }
    log::info!("wrote {}", output_path.display());

    Ok(RunReport {
        projection,
        output_path,
    })
}
