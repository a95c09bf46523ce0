use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use zaprun_client::ClientError;
use zaprun_core::ScanId;

/// Errors that end a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A call to the scanner daemon failed
    #[error("scanner error: {0}")]
    Client(#[from] ClientError),

    /// Polling hit the configured `max_polls` bound before completion
    #[error("spider {scan_id} still incomplete after {polls} polls")]
    PollLimitExceeded {
        /// Crawl that was being polled
        scan_id: ScanId,
        /// Polls made before giving up
        polls: u32,
    },

    /// Polling hit the configured timeout before completion
    #[error("spider {scan_id} still incomplete after {elapsed:?}")]
    PollTimeout {
        /// Crawl that was being polled
        scan_id: ScanId,
        /// Time spent polling
        elapsed: Duration,
    },

    /// Alerts could not be serialized
    #[error("failed to serialize alerts: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Output file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
