//! The remote scanner operations the orchestrator depends on.

use crate::error::Result;
use async_trait::async_trait;
use zaprun_core::{AlertRecord, Progress, ScanId};

/// Remote procedures exposed by a scanner daemon.
///
/// Implementations must be thread-safe (Send + Sync) so a single client can
/// be shared behind an `Arc`.
#[async_trait]
pub trait ScannerApi: Send + Sync {
    /// Start spidering `url` and return the handle used to poll it.
    async fn start_spider(&self, url: &str) -> Result<ScanId>;

    /// Current completion of the crawl identified by `scan_id`.
    async fn spider_status(&self, scan_id: &ScanId) -> Result<Progress>;

    /// Every alert the daemon holds for URLs under `base_url`, in daemon order.
    async fn alerts(&self, base_url: &str) -> Result<Vec<AlertRecord>>;
}
