//! Alert report output.

use crate::error::{Result, ScanError};
use std::fmt;
use std::path::Path;
use zaprun_core::AlertRecord;

/// Write alerts as a pretty-printed JSON array (2-space indent).
///
/// The records are written exactly as received. An existing file at `path`
/// is replaced; missing parent directories are created.
pub async fn write_alerts(path: &Path, alerts: &[AlertRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(alerts)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ScanError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, json)
        .await
        .map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Wrote {} alerts to {}", alerts.len(), path.display());
    Ok(())
}

/// Alert counts per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskSummary {
    /// `High` risk alerts
    pub high: usize,
    /// `Medium` risk alerts
    pub medium: usize,
    /// `Low` risk alerts
    pub low: usize,
    /// `Informational` alerts
    pub informational: usize,
    /// Alerts with a missing or unrecognised risk label
    pub other: usize,
}

impl RiskSummary {
    /// Count alerts by their `risk` field.
    #[must_use]
    pub fn from_alerts(alerts: &[AlertRecord]) -> Self {
        alerts.iter().fold(Self::default(), |mut summary, alert| {
            match alert.risk() {
                Some("High") => summary.high += 1,
                Some("Medium") => summary.medium += 1,
                Some("Low") => summary.low += 1,
                Some("Informational") => summary.informational += 1,
                _ => summary.other += 1,
            }
            summary
        })
    }

    /// Total number of alerts counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.informational + self.other
    }
}

impl fmt::Display for RiskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "High: {}, Medium: {}, Low: {}, Informational: {}",
            self.high, self.medium, self.low, self.informational
        )?;
        if self.other > 0 {
            write!(f, ", Other: {}", self.other)?;
        }
        Ok(())
    }
}
