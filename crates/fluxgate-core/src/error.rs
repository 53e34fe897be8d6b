use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by the usage pipeline.
///
/// Data-shape problems never error -- malformed or empty responses
/// degrade to empty output. The only rejection is a structurally
/// invalid range selection, which is a caller bug rather than a data
/// anomaly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Custom range with `from` after `to`; no query must be issued.
    #[error("invalid range: start {from} is after end {to}")]
    InvalidRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}
