use anyhow::Result;

use standings_forecast::config::RunConfig;
use standings_forecast::pipeline::{self, RunReport};

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = RunConfig::from_env_and_args()?;

    let log_level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let report = pipeline::run(&config)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    let p = &report.projection;

    println!("Predicted results ({}):", p.predictions.len());
    for o in &p.predictions {
        println!(
            "  {:<24} {:<24} {}  {}-{}  ({:.2}, {:?})",
            o.home, o.away, o.label, o.home_points, o.away_points, o.chance, o.tier
        );
    }

    println!();
    println!("Projected standings:");
    for (idx, e) in p.standings.iter().enumerate() {
        println!(
            "  {:>3}. {:<24} {:>3} pts  {:>2} played  sets {}-{}",
            idx + 1,
            e.team,
            e.points,
            e.matches_played,
            e.sets_for,
            e.sets_against
        );
    }

    if !p.simulation.unknown_teams.is_empty() {
        println!();
        println!(
            "Not in standings (points skipped): {}",
            p.simulation.unknown_teams.join(", ")
        );
    }
    println!();
    println!("Saved: {}", report.output_path.display());
}
