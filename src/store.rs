// src/store.rs
// Dated snapshots: one `<YYYY-MM-DD>.json` per run, pruned by age.

use std::{fs, path::PathBuf};

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::config::Config;
use crate::config::consts::DATE_FMT;
use crate::data::NormalizedFirmRecord;
use crate::error::{PipelineError, Result};
use crate::file::write_json;

pub struct SnapshotStore {
    dir: PathBuf,
    run_date: NaiveDate,
    window_days: i64,
}

impl SnapshotStore {
    pub fn new(cfg: &Config) -> Self {
        Self {
            dir: cfg.output.snapshot_dir.clone(),
            run_date: cfg.run_date,
            window_days: cfg.output.snapshot_window_days,
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(join!(&date.format(DATE_FMT).to_string(), ".json"))
    }

    /// Write (or overwrite) the snapshot for the run date.
    pub fn write_snapshot(&self, records: &[NormalizedFirmRecord]) -> Result<PathBuf> {
        let path = self.path_for(self.run_date);
        write_json(&path, records)?;
        info!(path = %path.display(), firms = records.len(), "snapshot written");
        Ok(path)
    }

    /// Delete snapshots dated before `run_date - window_days`. Files that
    /// aren't named like a snapshot are left alone. Returns what was removed.
    pub fn prune(&self) -> Result<Vec<PathBuf>> {
        let io_err = |source| PipelineError::Io { path: self.dir.clone(), source };

        let mut removed = Vec::new();
        // A window reaching past the calendar's range prunes nothing.
        let Some(cutoff) = Duration::try_days(self.window_days)
            .and_then(|d| self.run_date.checked_sub_signed(d))
        else {
            return Ok(removed);
        };
        if !self.dir.exists() {
            return Ok(removed);
        }
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() { continue; }
            if path.extension().and_then(|s| s.to_str()) != Some("json") { continue; }

            let Some(date) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FMT).ok())
            else {
                continue;
            };
            if date < cutoff {
                fs::remove_file(&path)
                    .map_err(|source| PipelineError::Io { path: path.clone(), source })?;
                debug!(path = %path.display(), "pruned snapshot");
                removed.push(path);
            }
        }
        removed.sort();
        Ok(removed)
    }
}
