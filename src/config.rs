use std::path::PathBuf;

use anyhow::{Result, anyhow};

pub const STANDINGS_ENV: &str = "STANDINGS_CSV";
pub const RESULTS_ENV: &str = "RESULTS_CSV";
pub const FIXTURES_ENV: &str = "FIXTURES_CSV";
pub const OUTPUT_DIR_ENV: &str = "OUTPUT_DIR";
pub const OUTPUT_FORMAT_ENV: &str = "OUTPUT_FORMAT";
pub const BUCKET_TABLE_ENV: &str = "BUCKET_TABLE_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "xlsx" | "excel" => Some(OutputFormat::Xlsx),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub standings_path: PathBuf,
    pub results_path: PathBuf,
    pub fixtures_path: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub bucket_table_path: Option<PathBuf>,
    pub verbose: bool,
}

impl RunConfig {
    /// Reads the process arguments and environment. Call after `.env` files
    /// have been loaded.
    pub fn from_env_and_args() -> Result<Self> {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Each setting comes from its `--flag`, then its environment variable, then
    /// the default. Blank values count as unset.
    pub fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |flag: &str, key: &str| {
            flag_value(args, flag).or_else(|| env(key).filter(|v| !v.trim().is_empty()))
        };
        let path_or = |flag: &str, key: &str, default: &str| {
            PathBuf::from(lookup(flag, key).unwrap_or_else(|| default.to_string()))
        };

        let format = match lookup("--format", OUTPUT_FORMAT_ENV) {
            Some(raw) => OutputFormat::parse(&raw)
                .ok_or_else(|| anyhow!("unknown output format '{raw}' (expected csv, xlsx or json)"))?,
            None => OutputFormat::Csv,
        };

        Ok(Self {
            standings_path: path_or("--standings", STANDINGS_ENV, "standings.csv"),
            results_path: path_or("--results", RESULTS_ENV, "results.csv"),
            fixtures_path: path_or("--fixtures", FIXTURES_ENV, "fixtures.csv"),
            output_dir: path_or("--out-dir", OUTPUT_DIR_ENV, "."),
            format,
            bucket_table_path: lookup("--buckets", BUCKET_TABLE_ENV).map(PathBuf::from),
            verbose: has_flag(args, "--verbose") || has_flag(args, "-v"),
        })
    }

    pub fn output_path(&self, remaining_matches: usize) -> PathBuf {
        self.output_dir
            .join(output_file_name(remaining_matches, self.format))
    }
}

/// `final_standings_<n>_remaining.<ext>`, where `n` is the number of fixtures
/// the projection was built from.
pub fn output_file_name(remaining_matches: usize, format: OutputFormat) -> String {
    format!(
        "final_standings_{remaining_matches}_remaining.{}",
        format.extension()
    )
}

/// Value of `--name value` or `--name=value`. Blank values are ignored, and so
/// is a following argument that is itself a flag (`-v`, `--verbose`).
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with('-')
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = RunConfig::resolve(&[], |_| None).unwrap();
        assert_eq!(cfg.standings_path, PathBuf::from("standings.csv"));
        assert_eq!(cfg.results_path, PathBuf::from("results.csv"));
        assert_eq!(cfg.fixtures_path, PathBuf::from("fixtures.csv"));
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.format, OutputFormat::Csv);
        assert!(cfg.bucket_table_path.is_none());
        assert!(!cfg.verbose);
    }

    #[test]
    fn flags_beat_environment() {
        let env = HashMap::from([
            (STANDINGS_ENV, "env_standings.csv"),
            (OUTPUT_FORMAT_ENV, "json"),
            (BUCKET_TABLE_ENV, "  "),
        ]);
        let cfg = RunConfig::resolve(
            &args(&["--standings=cli.csv", "--format", "xlsx", "-v"]),
            |k| env.get(k).map(|v| v.to_string()),
        )
        .unwrap();
        assert_eq!(cfg.standings_path, PathBuf::from("cli.csv"));
        assert_eq!(cfg.format, OutputFormat::Xlsx);
        assert!(cfg.bucket_table_path.is_none());
        assert!(cfg.verbose);
    }

    #[test]
    fn environment_fills_missing_flags() {
        let env = HashMap::from([(RESULTS_ENV, "Resultaten.csv"), (OUTPUT_DIR_ENV, "out")]);
        let cfg = RunConfig::resolve(&[], |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.results_path, PathBuf::from("Resultaten.csv"));
        assert_eq!(cfg.output_path(7), PathBuf::from("out/final_standings_7_remaining.csv"));
    }

    #[test]
    fn unknown_format_is_an_error() {
        assert!(RunConfig::resolve(&args(&["--format=pdf"]), |_| None).is_err());
    }

    #[test]
    fn flag_without_value_is_ignored() {
        let a = args(&["--fixtures", "--verbose"]);
        assert_eq!(flag_value(&a, "--fixtures"), None);
    }

    #[test]
    fn short_flag_is_not_taken_as_a_value() {
        let cfg = RunConfig::resolve(&args(&["--out-dir", "-v"]), |_| None).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert!(cfg.verbose);
        assert_eq!(flag_value(&args(&["--out-dir=-v"]), "--out-dir"), Some("-v".to_string()));
    }
}
