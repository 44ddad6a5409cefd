// src/runner.rs
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    config::Config,
    core::{Fetch, HttpClient},
    data::{FirmRecord, NormalizedFirmRecord},
    error::{PipelineError, Result},
    file::{read_json, write_csv, write_json},
    progress::Progress,
    scrape::{collect_firms, filter_recent},
    specs::parse_list,
    store::SnapshotStore,
    transform::Transformer,
    validate::{self, Issue, Metrics},
};

const ISSUE_HEADERS: &[&str] = &["row", "level", "index", "field", "issue"];
const METRIC_HEADERS: &[&str] = &[
    "total_firms",
    "firms_missing_licence_start",
    "firms_missing_licence_end",
    "firms_with_no_licensees",
];

/// Summary of what a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub firms_listed: usize,
    pub firms_queued: usize,
    pub firms_collected: usize,
    pub issues: usize,
    pub metrics: Metrics,
    pub files_written: Vec<PathBuf>,
    pub snapshots_pruned: Vec<PathBuf>,
}

/// What [`Pipeline::ingest`] collected, with the counts along the way.
#[derive(Debug)]
pub struct Ingested {
    pub records: Vec<FirmRecord>,
    pub listed: usize,
    pub queued: usize,
}

/// Ingest → transform → validate → snapshot, one stage after another.
/// Each stage writes its own artifact, so a later stage can be re-run from
/// an earlier file (see [`load_raw`]).
pub struct Pipeline<F: Fetch = HttpClient> {
    cfg: Config,
    fetcher: F,
}

impl Pipeline<HttpClient> {
    /// Pipeline with a real HTTP client sized to the worker pool.
    pub fn new(cfg: Config) -> Result<Self> {
        let fetcher = HttpClient::new(&cfg.net, cfg.scrape.workers).map_err(PipelineError::Client)?;
        Self::with_fetcher(cfg, fetcher)
    }
}

impl<F: Fetch> Pipeline<F> {
    pub fn with_fetcher(cfg: Config, fetcher: F) -> Result<Self> {
        cfg.ensure_dirs()?;
        Ok(Self { cfg, fetcher })
    }

    /// Fetch the list page, keep recently active firms and collect their
    /// detail pages. Raw records go to `firms_raw_<date>.json`.
    ///
    /// Only a list page that can't be fetched fails the run; everything
    /// past that degrades per firm.
    pub fn ingest(&self, mut progress: Option<&mut dyn Progress>) -> Result<Ingested> {
        let base = &self.cfg.net.base_url;
        info!(url = %base, "[INGEST] fetching list page");
        let html = self.fetcher.fetch(base).map_err(PipelineError::ListPage)?;

        let stubs = parse_list(&html, base);
        let listed = stubs.len();
        info!(firms = listed, "[INGEST] list page parsed");

        let stubs = filter_recent(stubs, self.cfg.scrape.days_filter, self.cfg.run_date);
        info!(
            kept = stubs.len(),
            dropped = listed - stubs.len(),
            days = self.cfg.scrape.days_filter,
            "[FILTER] recent firms"
        );

        let queued = stubs.len();
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!(
                "{} of {} listed firms licensed within {} days",
                queued, listed, self.cfg.scrape.days_filter
            ));
        }
        let records = collect_firms(&stubs, &self.fetcher, &self.cfg, progress);

        let path = self.cfg.raw_file();
        write_json(&path, &records)?;
        info!(path = %path.display(), firms = records.len(), "[INGEST] raw records written");
        Ok(Ingested { records, listed, queued })
    }

    /// Normalize raw records and write `firms_processed_<date>.json`.
    pub fn transform(&self, raw: &[FirmRecord]) -> Result<Vec<NormalizedFirmRecord>> {
        let records = Transformer::new(self.cfg.run_date).normalize(raw);
        let path = self.cfg.processed_file();
        write_json(&path, &records)?;
        info!(path = %path.display(), firms = records.len(), "[TRANSFORM] processed records written");
        Ok(records)
    }

    /// Write the issues table and the metrics row. Never fails on content.
    pub fn validate(&self, records: &[NormalizedFirmRecord]) -> Result<(Vec<Issue>, Metrics)> {
        let issues = validate::validate(records);
        let metrics = validate::metrics(records);

        write_csv(&self.cfg.validation_file(), ISSUE_HEADERS, &issues)?;
        write_csv(&self.cfg.metrics_file(), METRIC_HEADERS, std::slice::from_ref(&metrics))?;
        info!(
            issues = issues.len(),
            total_firms = metrics.total_firms,
            no_licensees = metrics.firms_with_no_licensees,
            "[VALIDATE] report written"
        );
        Ok((issues, metrics))
    }

    /// Write today's snapshot, then prune the ones outside the window.
    pub fn snapshot(&self, records: &[NormalizedFirmRecord]) -> Result<(PathBuf, Vec<PathBuf>)> {
        let store = SnapshotStore::new(&self.cfg);
        let path = store.write_snapshot(records)?;
        let pruned = store.prune()?;
        info!(pruned = pruned.len(), "[SNAPSHOT] done");
        Ok((path, pruned))
    }

    /// Full run from the live list page.
    pub fn run(&self, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
        let ingested = self.ingest(progress)?;

        let mut summary = self.finish_from(&ingested.records)?;
        summary.firms_listed = ingested.listed;
        summary.firms_queued = ingested.queued;
        summary.files_written.insert(0, self.cfg.raw_file());
        Ok(summary)
    }

    /// Re-run transform, validate and snapshot over a saved raw file
    /// without touching the network.
    pub fn run_from_raw(&self, raw_path: &Path) -> Result<RunSummary> {
        let raw = load_raw(raw_path)?;
        info!(path = %raw_path.display(), firms = raw.len(), "[INGEST] loaded raw records");
        let mut summary = self.finish_from(&raw)?;
        summary.firms_listed = raw.len();
        summary.firms_queued = raw.len();
        Ok(summary)
    }

    fn finish_from(&self, raw: &[FirmRecord]) -> Result<RunSummary> {
        let records = self.transform(raw)?;
        let (issues, metrics) = self.validate(&records)?;
        let (snapshot, pruned) = self.snapshot(&records)?;

        Ok(RunSummary {
            firms_listed: 0,
            firms_queued: 0,
            firms_collected: records.len(),
            issues: issues.len(),
            metrics,
            files_written: vec![
                self.cfg.processed_file(),
                self.cfg.validation_file(),
                self.cfg.metrics_file(),
                snapshot,
            ],
            snapshots_pruned: pruned,
        })
    }
}

/// Read a raw file written by [`Pipeline::ingest`].
pub fn load_raw(path: &Path) -> Result<Vec<FirmRecord>> {
    read_json(path)
}
