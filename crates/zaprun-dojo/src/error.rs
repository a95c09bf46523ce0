//! Error types for DefectDojo uploads.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while importing a report.
#[derive(Error, Debug)]
pub enum DojoError {
    /// A required `[defectdojo]` setting is not configured
    #[error("missing DefectDojo setting: {0} (set it in config or via environment)")]
    MissingSetting(&'static str),

    /// Report file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Transport failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// DefectDojo rejected the import
    #[error("failed to upload {} - {status}: {message}", path.display())]
    Api {
        /// Report that was rejected
        path: PathBuf,
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Report file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for upload operations.
pub type Result<T> = std::result::Result<T, DojoError>;
