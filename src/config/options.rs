// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use super::consts::*;
use crate::error::{PipelineError, Result};
use crate::file::ensure_directory;

/// Everything one pipeline run needs. Built once, then handed to each
/// component by reference; nothing reads configuration from globals.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub net: NetOptions,
    pub scrape: ScrapeOptions,
    pub output: OutputOptions,
    /// Stamped into `last_updated` and every output file name.
    pub run_date: NaiveDate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            net: NetOptions::default(),
            scrape: ScrapeOptions::default(),
            output: OutputOptions::default(),
            run_date: Local::now().date_naive(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetOptions {
    pub base_url: String,
    pub verify_ssl: bool,
    pub timeout_secs: u64,
    /// Total attempts per URL, first one included.
    pub max_retries: u32,
    pub backoff_secs: f64,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            verify_ssl: VERIFY_SSL,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            max_retries: MAX_RETRIES,
            backoff_secs: BACKOFF_SECS,
        }
    }
}

impl NetOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub workers: usize,
    pub days_filter: i64,
    pub fetch_history: bool,
    /// Per-worker pause after each firm.
    pub pause_ms: u64,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            workers: WORKERS,
            days_filter: DAYS_FILTER,
            fetch_history: FETCH_LICENSEE_HISTORY,
            pause_ms: REQUEST_PAUSE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub snapshot_window_days: i64,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(RAW_DIR),
            processed_dir: PathBuf::from(PROCESSED_DIR),
            logs_dir: PathBuf::from(LOGS_DIR),
            snapshot_dir: PathBuf::from(SNAPSHOT_DIR),
            snapshot_window_days: SNAPSHOT_WINDOW_DAYS,
        }
    }
}

impl OutputOptions {
    /// Put all four directories under one root, keeping the default layout.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            raw_dir: root.join("raw"),
            processed_dir: root.join("processed"),
            logs_dir: root.join("logs"),
            snapshot_dir: root.join("snapshots"),
            snapshot_window_days: SNAPSHOT_WINDOW_DAYS,
        }
    }
}

impl Config {
    pub fn run_date_str(&self) -> String {
        self.run_date.format(DATE_FMT).to_string()
    }

    pub fn raw_file(&self) -> PathBuf {
        self.output.raw_dir.join(join!("firms_raw_", &self.run_date_str(), ".json"))
    }

    pub fn processed_file(&self) -> PathBuf {
        self.output.processed_dir.join(join!("firms_processed_", &self.run_date_str(), ".json"))
    }

    pub fn metrics_file(&self) -> PathBuf {
        self.output.logs_dir.join(join!("metrics_", &self.run_date_str(), ".csv"))
    }

    pub fn validation_file(&self) -> PathBuf {
        self.output.logs_dir.join(join!("validation_", &self.run_date_str(), ".csv"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.output.logs_dir.join(join!("run_", &self.run_date_str(), ".log"))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            &self.output.raw_dir,
            &self.output.processed_dir,
            &self.output.logs_dir,
            &self.output.snapshot_dir,
        ] {
            ensure_directory(dir)
                .map_err(|source| PipelineError::Io { path: dir.clone(), source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_carry_run_date() {
        let mut cfg = Config::default();
        cfg.run_date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        cfg.output = OutputOptions::rooted_at("out");

        assert_eq!(cfg.raw_file(), PathBuf::from("out/raw/firms_raw_2024-03-09.json"));
        assert_eq!(
            cfg.processed_file(),
            PathBuf::from("out/processed/firms_processed_2024-03-09.json")
        );
        assert_eq!(cfg.metrics_file(), PathBuf::from("out/logs/metrics_2024-03-09.csv"));
        assert_eq!(cfg.validation_file(), PathBuf::from("out/logs/validation_2024-03-09.csv"));
    }

    #[test]
    fn defaults_match_registry_run() {
        let cfg = Config::default();
        assert_eq!(cfg.scrape.workers, 8);
        assert_eq!(cfg.scrape.days_filter, 365);
        assert_eq!(cfg.net.max_retries, 3);
        assert!(!cfg.scrape.fetch_history);
        assert_eq!(cfg.net.timeout(), Duration::from_secs(20));
    }
}
