use clap::{CommandFactory, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StatsError};
use crate::models::{CleaningPolicy, TrendFill};

// ── ReportFormat ───────────────────────────────────────────────────────────────

/// How the summary report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable console summary.
    #[default]
    Text,
    /// Pretty-printed JSON of the full report.
    Json,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summary statistics for crime incident records
#[derive(Parser, Debug, Clone)]
#[command(
    name = "crime-stats",
    about = "Summary statistics for crime incident records",
    version
)]
pub struct Settings {
    /// CSV file or directory of CSV files (defaults to ./crime_data.csv)
    #[arg(long, env = "CRIME_STATS_DATA")]
    pub data_path: Option<PathBuf>,

    /// Which fields a record must carry to survive cleaning
    #[arg(long, value_enum, default_value_t = CleaningPolicy::RequireOutcome)]
    pub policy: CleaningPolicy,

    /// Monthly trend filling
    #[arg(long, value_enum, default_value_t = TrendFill::Sparse)]
    pub trend: TrendFill,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Number of areas kept in the area distribution
    #[arg(long, default_value = "10")]
    pub top_areas: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.crime-stats/last_used.json`.
///
/// The data path is per-run and never persisted.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<CleaningPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_areas: Option<usize>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".crime-stats").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation with an explicit argument list and config path so
    /// that tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; clap ids are the field names.
        if !is_arg_explicitly_set(&matches, "policy") {
            if let Some(v) = last.policy {
                settings.policy = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "trend") {
            if let Some(v) = last.trend {
                settings.trend = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_areas") {
            if let Some(v) = last.top_areas {
                settings.top_areas = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("Could not persist last-used params: {}", e);
        }

        settings
    }

    /// Reject values clap cannot rule out on its own.
    pub fn validate(&self) -> Result<()> {
        if self.top_areas == 0 {
            return Err(StatsError::Config(
                "--top-areas must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            policy: Some(s.policy),
            trend: Some(s.trend),
            format: Some(s.format),
            top_areas: Some(s.top_areas),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            policy: Some(CleaningPolicy::RequireOutcomeAndLocation),
            trend: Some(TrendFill::Dense),
            format: Some(ReportFormat::Json),
            top_areas: Some(5),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.policy, Some(CleaningPolicy::RequireOutcomeAndLocation));
        assert_eq!(loaded.trend, Some(TrendFill::Dense));
        assert_eq!(loaded.format, Some(ReportFormat::Json));
        assert_eq!(loaded.top_areas, Some(5));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.policy.is_none());
        assert!(loaded.trend.is_none());
        assert!(loaded.format.is_none());
        assert!(loaded.top_areas.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).policy.is_none());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["crime-stats"]);

        assert_eq!(settings.policy, CleaningPolicy::RequireOutcome);
        assert_eq!(settings.trend, TrendFill::Sparse);
        assert_eq!(settings.format, ReportFormat::Text);
        assert_eq!(settings.top_areas, 10);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_policy_names() {
        let settings =
            Settings::parse_from(["crime-stats", "--policy", "require-outcome-and-location"]);
        assert_eq!(settings.policy, CleaningPolicy::RequireOutcomeAndLocation);

        let settings = Settings::parse_from(["crime-stats", "--policy", "keep-all"]);
        assert_eq!(settings.policy, CleaningPolicy::KeepAll);
    }

    #[test]
    fn test_settings_cli_trend_and_format() {
        let settings =
            Settings::parse_from(["crime-stats", "--trend", "dense", "--format", "json"]);
        assert_eq!(settings.trend, TrendFill::Dense);
        assert_eq!(settings.format, ReportFormat::Json);
    }

    #[test]
    fn test_validate_rejects_zero_top_areas() {
        let settings = Settings::parse_from(["crime-stats", "--top-areas", "0"]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("--top-areas"));

        let settings = Settings::parse_from(["crime-stats", "--top-areas", "3"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_policy() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            policy: Some(CleaningPolicy::RequireOutcomeAndLocation),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(vec!["crime-stats".into()], &config_path);
        assert_eq!(settings.policy, CleaningPolicy::RequireOutcomeAndLocation);
    }

    #[test]
    fn test_load_with_last_used_does_not_remember_data_path() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let first = Settings::load_with_last_used_impl(
            vec!["crime-stats".into(), "--data-path".into(), "/old/export.csv".into()],
            &config_path,
        );
        assert_eq!(first.data_path, Some(PathBuf::from("/old/export.csv")));

        let saved = std::fs::read_to_string(&config_path).expect("saved params");
        assert!(!saved.contains("export.csv"));

        let second = Settings::load_with_last_used_impl(vec!["crime-stats".into()], &config_path);
        assert!(second.data_path.is_none());
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            trend: Some(TrendFill::Dense),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["crime-stats".into(), "--trend".into(), "sparse".into()],
            &config_path,
        );
        assert_eq!(settings.trend, TrendFill::Sparse);
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            format: Some(ReportFormat::Json),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");
        assert!(config_path.exists());

        Settings::load_with_last_used_impl(
            vec!["crime-stats".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["crime-stats".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["crime-stats".into(), "--top-areas".into(), "4".into()],
            &config_path,
        );

        assert!(config_path.exists(), "config file must be persisted after run");
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.top_areas, Some(4));
        assert_eq!(loaded.policy, Some(CleaningPolicy::RequireOutcome));
    }
}
