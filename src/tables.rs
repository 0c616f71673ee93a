use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::league::{Fixture, MatchResult};
use crate::standings::StandingsEntry;

pub const STANDINGS_HEADER: [&str; 8] = [
    "Ranking",
    "Team",
    "Matches",
    "Points",
    "Sets for",
    "Sets against",
    "Points for",
    "Points against",
];

// Column names seen across exports: English, plus the Dutch federation's
// `Team thuis` / `Uitslag` / `Teamnaam` style headers. The required lists
// must stay in step with the serde aliases below.

const HOME_COLUMNS: &[&str] = &["home", "Home", "Team thuis", "Team1"];
const AWAY_COLUMNS: &[&str] = &["away", "Away", "Team uit", "Team2"];
const TEAM_COLUMNS: &[&str] = &["team", "Team", "Teamnaam"];
const POINTS_COLUMNS: &[&str] = &["points", "Points", "Punten"];

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(alias = "Home", alias = "Team thuis", alias = "Team1")]
    home: String,
    #[serde(alias = "Away", alias = "Team uit", alias = "Team2")]
    away: String,
    #[serde(default, alias = "Score", alias = "Uitslag")]
    score: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    #[serde(alias = "Home", alias = "Team thuis", alias = "Team1")]
    home: String,
    #[serde(alias = "Away", alias = "Team uit", alias = "Team2")]
    away: String,
}

#[derive(Debug, Deserialize)]
struct RawStanding {
    #[serde(alias = "Team", alias = "Teamnaam")]
    team: String,
    #[serde(default, alias = "Matches", alias = "Wedstrijden")]
    matches: Option<u32>,
    #[serde(alias = "Points", alias = "Punten")]
    points: u32,
    #[serde(default, alias = "Sets for", alias = "Sets voor")]
    sets_for: Option<u32>,
    #[serde(default, alias = "Sets against", alias = "Sets tegen")]
    sets_against: Option<u32>,
    #[serde(default, alias = "Points for", alias = "Punten voor")]
    points_for: Option<u32>,
    #[serde(default, alias = "Points against", alias = "Punten tegen")]
    points_against: Option<u32>,
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

/// Fails unless the header row names every required column under one of its
/// accepted spellings. Rows are only checked one by one after this passes.
fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    table: &str,
    required: &[&[&str]],
) -> Result<()> {
    let headers = reader
        .headers()
        .with_context(|| format!("read {table} header row"))?;
    let missing = required
        .iter()
        .filter(|names| !headers.iter().any(|h| names.contains(&h)))
        .map(|names| names[0])
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return Ok(());
    }
    Err(anyhow!(
        "{table} table is missing column(s) {} (header row: [{}])",
        missing.join(", "),
        headers.iter().collect::<Vec<_>>().join(", ")
    ))
}

pub fn read_results<R: Read>(rdr: R) -> Result<Vec<MatchResult>> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, "results", &[HOME_COLUMNS, AWAY_COLUMNS])?;
    let mut out = Vec::new();
    for (row, record) in reader.deserialize::<RawResult>().enumerate() {
        let raw = match record {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("skipping malformed result row {}: {err}", row + 1);
                continue;
            }
        };
        let result = MatchResult::from_score_cell(raw.home, raw.away, raw.score.as_deref());
        if result.is_placeholder() {
            log::debug!(
                "{} vs {}: score {:?} unreadable, counting it as {}-{}",
                result.home,
                result.away,
                raw.score.as_deref().unwrap_or(""),
                result.home_sets,
                result.away_sets
            );
        }
        out.push(result);
    }
    Ok(out)
}

pub fn read_fixtures<R: Read>(rdr: R) -> Result<Vec<Fixture>> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, "fixtures", &[HOME_COLUMNS, AWAY_COLUMNS])?;
    let mut out = Vec::new();
    for (row, record) in reader.deserialize::<RawFixture>().enumerate() {
        match record {
            Ok(raw) => out.push(Fixture::new(raw.home, raw.away)),
            Err(err) => log::warn!("skipping malformed fixture row {}: {err}", row + 1),
        }
    }
    Ok(out)
}

pub fn read_standings<R: Read>(rdr: R) -> Result<Vec<StandingsEntry>> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, "standings", &[TEAM_COLUMNS, POINTS_COLUMNS])?;
    let mut out = Vec::new();
    for (row, record) in reader.deserialize::<RawStanding>().enumerate() {
        match record {
            Ok(raw) => out.push(StandingsEntry {
                team: raw.team,
                matches_played: raw.matches.unwrap_or(0),
                points: raw.points,
                sets_for: raw.sets_for.unwrap_or(0),
                sets_against: raw.sets_against.unwrap_or(0),
                points_for: raw.points_for.unwrap_or(0),
                points_against: raw.points_against.unwrap_or(0),
            }),
            Err(err) => log::warn!("skipping malformed standings row {}: {err}", row + 1),
        }
    }
    Ok(out)
}

pub fn load_results(path: &Path) -> Result<Vec<MatchResult>> {
    let file = open(path, "results")?;
    read_results(file).with_context(|| format!("read results {}", path.display()))
}

pub fn load_fixtures(path: &Path) -> Result<Vec<Fixture>> {
    let file = open(path, "fixtures")?;
    read_fixtures(file).with_context(|| format!("read fixtures {}", path.display()))
}

pub fn load_standings(path: &Path) -> Result<Vec<StandingsEntry>> {
    let file = open(path, "standings")?;
    read_standings(file).with_context(|| format!("read standings {}", path.display()))
}

fn open(path: &Path, what: &str) -> Result<File> {
    File::open(path).with_context(|| format!("open {what} file {}", path.display()))
}

/// Rows as written to every output format, header first. `ranked` must already
/// be in final order; the ranking column counts from 1.
pub fn standings_rows(ranked: &[StandingsEntry]) -> Vec<Vec<String>> {
    let mut rows = vec![STANDINGS_HEADER.iter().map(|h| h.to_string()).collect()];
    for (idx, e) in ranked.iter().enumerate() {
        rows.push(vec![
            (idx + 1).to_string(),
            e.team.clone(),
            e.matches_played.to_string(),
            e.points.to_string(),
            e.sets_for.to_string(),
            e.sets_against.to_string(),
            e.points_for.to_string(),
            e.points_against.to_string(),
        ]);
    }
    rows
}

pub fn write_standings<W: Write>(wtr: W, ranked: &[StandingsEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    for row in standings_rows(ranked) {
        writer.write_record(&row).context("write standings row")?;
    }
    writer.flush().context("flush standings csv")?;
    Ok(())
}

/// Writes the table through a temp file so a failed run never leaves a
/// half-written output behind.
pub fn save_standings_csv(path: &Path, ranked: &[StandingsEntry]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let file = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        write_standings(file, ranked)?;
    }
    fs::rename(&tmp, path).with_context(|| format!("swap standings csv {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_read_dutch_headers() {
        let raw = "\
Team thuis,Team uit,Uitslag
Alpha,Beta,3-1
Beta,Gamma,
Gamma,Alpha,2-3
";
        let results = read_results(raw.as_bytes()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!((results[0].home_sets, results[0].away_sets), (3, 1));
        assert!(results[1].is_placeholder());
        assert_eq!(results[2].point_split(), (2, 3));
    }

    #[test]
    fn results_without_score_column_are_placeholders() {
        let raw = "home,away\nA,B\n";
        let results = read_results(raw.as_bytes()).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_placeholder());
    }

    #[test]
    fn standings_accept_partial_columns() {
        let raw = "Team,Points\nAlpha,12\nBeta,not-a-number\nGamma,7\n";
        let rows = read_standings(raw.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], StandingsEntry::new("Alpha", 12));
        assert_eq!(rows[1].team, "Gamma");
    }

    #[test]
    fn fixtures_read_team1_team2() {
        let raw = "Team1,Team2\n A , B \nC,D\n";
        let fixtures = read_fixtures(raw.as_bytes()).unwrap();
        assert_eq!(fixtures, vec![Fixture::new("A", "B"), Fixture::new("C", "D")]);
    }

    #[test]
    fn missing_required_columns_are_errors() {
        let err = read_standings("Teamnaam,Pnt\nA,3\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("points"), "{err}");

        let err = read_results("Thuis,Uit,Uitslag\nA,B,3-1\n".as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("home") && msg.contains("away"), "{msg}");

        assert!(read_fixtures("Team1,Opponent\nA,B\n".as_bytes()).is_err());
        assert!(read_fixtures("".as_bytes()).is_err());
    }

    #[test]
    fn header_only_tables_are_empty_not_errors() {
        assert!(read_fixtures("Team thuis,Team uit\n".as_bytes()).unwrap().is_empty());
        assert!(read_standings("Team,Points\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn written_table_has_ranking_column() {
        let ranked = vec![StandingsEntry::new("A", 9), StandingsEntry::new("B", 4)];
        let mut buf = Vec::new();
        write_standings(&mut buf, &ranked).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Ranking,Team,Matches,Points,Sets for,Sets against,Points for,Points against")
        );
        assert_eq!(lines.next(), Some("1,A,0,9,0,0,0,0"));
        assert_eq!(lines.next(), Some("2,B,0,4,0,0,0,0"));
    }
}
