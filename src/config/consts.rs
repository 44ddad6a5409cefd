// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://webb-site.com/dbpub/SFClicount.asp";
pub const VERIFY_SSL: bool = false; // upstream cert has a hostname mismatch
pub const REQUEST_TIMEOUT_SECS: u64 = 20;
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_SECS: f64 = 2.0;
pub const USER_AGENT: &str = concat!("sfc_scrape/", env!("CARGO_PKG_VERSION"));

// Status codes worth another attempt
pub const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

// Scrape
pub const DAYS_FILTER: i64 = 365; // list-page Licence start must fall within this window
pub const FETCH_LICENSEE_HISTORY: bool = false;

// Concurrency
pub const WORKERS: usize = 8; // polite; reduce if the server starts returning 500s
pub const REQUEST_PAUSE_MS: u64 = 0;

// Output
pub const RAW_DIR: &str = "data/raw";
pub const PROCESSED_DIR: &str = "data/processed";
pub const LOGS_DIR: &str = "data/logs";
pub const SNAPSHOT_DIR: &str = "data/snapshots";
pub const SNAPSHOT_WINDOW_DAYS: i64 = 90;

// Canonical on-disk date form
pub const DATE_FMT: &str = "%Y-%m-%d";
