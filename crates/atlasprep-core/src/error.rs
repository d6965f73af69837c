// crates/atlasprep-core/src/error.rs
use thiserror::Error;

/// Errors raised by the preparation pipelines.
///
/// Only fatal conditions live here. Recoverable per-row problems (a country
/// name that does not resolve, a value that does not parse) are skipped where
/// they happen and show up as counters in the pipeline reports instead.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header lacks a column the extraction needs.
    #[error("missing column in CSV header: {0}")]
    MissingColumn(String),

    #[error("invalid property allowlist: {0}")]
    InvalidAllowlist(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, PrepError>;
