// src/error.rs
use std::path::PathBuf;

use crate::core::FetchError;

/// Failures that end a run. Per-firm and per-row problems never get here;
/// they degrade to skipped records or empty fields.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unable to fetch list page: {0}")]
    ListPage(#[source] FetchError),
    #[error("http client: {0}")]
    Client(#[source] FetchError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
