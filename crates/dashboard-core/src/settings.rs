use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::partition::DEFAULT_THRESHOLD_DATE;

/// Directory under the user's home that holds logs and last-used params.
pub const APP_DIR_NAME: &str = ".sales-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Pink Morsel sales before and after the January 2021 price increase
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-dashboard",
    about = "Pink Morsel sales before and after the January 2021 price increase",
    version
)]
pub struct Settings {
    /// What to run
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "table", "summary", "merge"])]
    pub mode: String,

    /// Directory scanned for raw per-region CSV files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Raw input file (repeatable; overrides --data-dir discovery, order kept)
    #[arg(long = "input")]
    pub inputs: Vec<PathBuf>,

    /// Merged canonical CSV written by `merge` and read by the other modes
    #[arg(long, default_value = "pink_morsels_sales.csv")]
    pub merged_file: PathBuf,

    /// Product kept by the merge (exact, case-sensitive)
    #[arg(long, default_value = "pink morsel")]
    pub product: String,

    /// Price-change date splitting before/after totals (YYYY-MM-DD)
    #[arg(long, default_value = DEFAULT_THRESHOLD_DATE)]
    pub threshold_date: NaiveDate,

    /// Initial region filter ("all" or a region name, case-insensitive)
    #[arg(long, default_value = "all")]
    pub region: String,

    /// Re-run the merge before loading, even if the merged file exists
    #[arg(long)]
    pub remerge: bool,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// JSON-lines file receiving per-request diagnostic events
    #[arg(long)]
    pub diagnostics_log: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    /// Modes that take over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.mode.as_str(), "dashboard" | "table")
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.sales-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl LastUsedParams {
    /// Default location: `~/.sales-dashboard/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params, returning `Default` when the file is absent or
    /// cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill unset values from the last run, and persist
    /// the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation with explicit args and config path so tests can
    /// redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_flags(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "region") {
            if let Some(v) = last.region {
                settings.region = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "mode") {
            if let Some(v) = last.mode {
                settings.mode = v;
            }
        }

        settings = Self::apply_flags(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("could not persist last-used params: {}", e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_flags(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    /// One-shot modes (`merge`, `summary`) are never remembered.
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            region: Some(s.region.clone()),
            mode: s.is_interactive().then(|| s.mode.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
