// src/cli.rs
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use crate::{
    config::{Config, OutputOptions},
    progress::Progress,
    runner::{Pipeline, RunSummary},
};

/// Scrape the SFC public register of licensed corporations into dated
/// JSON/CSV artifacts.
#[derive(Debug, Parser)]
#[command(name = "sfc_scrape", version)]
pub struct Args {
    /// List page URL
    #[arg(long, env = "SFC_BASE_URL")]
    pub base_url: Option<String>,

    /// Verify TLS certificates (off by default; the register's chain is often incomplete)
    #[arg(long, env = "SFC_VERIFY_SSL")]
    pub verify_ssl: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "SFC_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Attempts per URL
    #[arg(long, env = "SFC_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Base backoff in seconds, multiplied by the attempt number
    #[arg(long, env = "SFC_BACKOFF_SECS")]
    pub backoff_secs: Option<f64>,

    /// Concurrent detail-page workers
    #[arg(short, long, env = "SFC_WORKERS")]
    pub workers: Option<usize>,

    /// Keep firms whose licence started within this many days
    #[arg(long, env = "SFC_DAYS_FILTER")]
    pub days_filter: Option<i64>,

    /// Follow each licensee's page for their licence history
    #[arg(long, env = "SFC_FETCH_HISTORY")]
    pub fetch_history: bool,

    /// Pause per worker between firms, in milliseconds
    #[arg(long, env = "SFC_PAUSE_MS")]
    pub pause_ms: Option<u64>,

    /// Root for raw/, processed/, logs/ and snapshots/
    #[arg(short, long, env = "SFC_OUT_ROOT")]
    pub out_root: Option<PathBuf>,

    /// Days of snapshots to keep
    #[arg(long, env = "SFC_SNAPSHOT_WINDOW_DAYS")]
    pub snapshot_window_days: Option<i64>,

    /// Date to stamp the run with (YYYY-MM-DD); defaults to today
    #[arg(long, env = "SFC_RUN_DATE")]
    pub run_date: Option<NaiveDate>,

    /// Skip the network and re-process a saved raw file
    #[arg(long)]
    pub from_raw: Option<PathBuf>,

    /// No per-firm progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Defaults, overridden by whatever was given on the command line or in
    /// the environment.
    pub fn into_config(self) -> Config {
        let mut cfg = Config::default();

        if let Some(v) = self.base_url { cfg.net.base_url = v; }
        cfg.net.verify_ssl |= self.verify_ssl;
        if let Some(v) = self.timeout_secs { cfg.net.timeout_secs = v; }
        if let Some(v) = self.max_retries { cfg.net.max_retries = v; }
        if let Some(v) = self.backoff_secs { cfg.net.backoff_secs = v; }

        if let Some(v) = self.workers { cfg.scrape.workers = v.max(1); }
        if let Some(v) = self.days_filter { cfg.scrape.days_filter = v; }
        cfg.scrape.fetch_history |= self.fetch_history;
        if let Some(v) = self.pause_ms { cfg.scrape.pause_ms = v; }

        if let Some(root) = self.out_root { cfg.output = OutputOptions::rooted_at(root); }
        if let Some(v) = self.snapshot_window_days { cfg.output.snapshot_window_days = v; }
        if let Some(v) = self.run_date { cfg.run_date = v; }

        cfg
    }
}

/// Prints a running counter to stderr.
#[derive(Default)]
pub struct CliProgress {
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Collecting {} firm pages...", total);
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, firm: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {}", self.done + self.failed, self.total, firm);
    }

    fn item_failed(&mut self, firm: &str) {
        self.failed += 1;
        eprintln!("[{}/{}] {} (failed)", self.done + self.failed, self.total, firm);
    }

    fn finish(&mut self) {
        eprintln!("Collected {} of {} ({} failed)", self.done, self.total, self.failed);
    }
}

pub fn run() -> Result<()> {
    let mut args = Args::parse();
    let from_raw = args.from_raw.take();
    let quiet = args.quiet;
    let cfg = args.into_config();

    cfg.ensure_dirs().wrap_err("creating output directories")?;
    crate::log::init(&cfg.log_file());

    let pipeline = Pipeline::new(cfg)?;
    let summary = match from_raw {
        Some(path) => pipeline
            .run_from_raw(&path)
            .wrap_err_with(|| format!("re-processing {}", path.display()))?,
        None => {
            let mut progress = CliProgress::default();
            let progress: Option<&mut dyn Progress> = if quiet { None } else { Some(&mut progress) };
            pipeline.run(progress)?
        }
    };

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "firms listed: {}, queued: {}, collected: {}, validation issues: {}",
        summary.firms_listed, summary.firms_queued, summary.firms_collected, summary.issues
    );
    for path in &summary.files_written {
        println!("wrote {}", path.display());
    }
    for path in &summary.snapshots_pruned {
        println!("pruned {}", path.display());
    }
}
