use std::path::PathBuf;

use anyhow::Result;

use standings_forecast::aggregate::{TeamAggregate, aggregate_results};
use standings_forecast::config::{RESULTS_ENV, flag_value, has_flag};
use standings_forecast::tables;

// Prints the per-team aggregates the predictor works from. Handy for checking
// a results export before running a projection.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let log_level = if has_flag(&args, "--verbose") { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let path = flag_value(&args, "--results")
        .or_else(|| std::env::var(RESULTS_ENV).ok().filter(|v| !v.trim().is_empty()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results.csv"));

    let results = tables::load_results(&path)?;
    let aggregates = aggregate_results(&results);

    let mut teams: Vec<(&String, &TeamAggregate)> = aggregates.iter().collect();
    teams.sort_by(|a, b| b.1.total_points.cmp(&a.1.total_points).then(a.0.cmp(b.0)));

    println!("Results: {} ({})", results.len(), path.display());
    println!(
        "{:<24} {:>6} {:>5} {:>6} {:>9}",
        "Team", "Played", "Wins", "Points", "Sets"
    );
    for (team, agg) in &teams {
        println!(
            "{:<24} {:>6} {:>5} {:>6} {:>4}-{:<4}",
            team, agg.matches_played, agg.wins, agg.total_points, agg.sets_won, agg.sets_lost
        );
    }

    if has_flag(&args, "--h2h") {
        println!();
        println!("Head-to-head points:");
        for (team, agg) in &teams {
            let mut rows: Vec<(&String, &u32)> = agg.head_to_head.iter().collect();
            rows.sort_by(|a, b| a.0.cmp(b.0));
            for (opponent, points) in rows {
                let against = aggregates
                    .get(opponent.as_str())
                    .map(|o| o.points_against(team))
                    .unwrap_or(0);
                println!("  {team:<24} vs {opponent:<24} {points:>3}-{against:<3}");
            }
        }
    }

    Ok(())
}
