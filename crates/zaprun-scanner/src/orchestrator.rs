//! Scan orchestrator for driving one crawl to completion.
//!
//! This module provides the `ScanOrchestrator`, which starts a spider on the
//! remote scanner, polls it until it reports completion, retrieves the
//! alerts for the target and persists them.

use crate::error::{Result, ScanError};
use crate::report::{self, RiskSummary};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use zaprun_client::ScannerApi;
use zaprun_core::{AlertRecord, ScanConfig, ScanId};

/// Default delay between status polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// How the orchestrator waits for a crawl to finish.
///
/// The interval is constant. With both bounds unset the orchestrator polls
/// until the crawl completes, however long that takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before each status poll
    pub interval: Duration,
    /// Maximum number of polls before giving up
    pub max_polls: Option<u32>,
    /// Maximum time spent polling before giving up
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_polls: None,
            timeout: None,
        }
    }
}

impl PollPolicy {
    /// Build a policy from the `[scan]` configuration section.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_polls: config.max_polls,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// What to scan and where the findings go.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// URL to spider; alerts are fetched for the same base URL
    pub target: String,
    /// Output file, overwritten on every run
    pub output_path: PathBuf,
    /// Polling behavior
    pub poll: PollPolicy,
}

impl ScanSettings {
    /// Build settings from the `[scan]` configuration section.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            target: config.target.clone(),
            output_path: config.output_path.clone(),
            poll: PollPolicy::from_config(config),
        }
    }
}

/// Result of a completed scan run.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Crawl handle assigned by the daemon
    pub scan_id: ScanId,
    /// Number of status polls made
    pub polls: u32,
    /// Number of alerts written
    pub alert_count: usize,
    /// Alert counts per risk level
    pub risk_summary: RiskSummary,
    /// File the alerts were written to
    pub output_path: PathBuf,
    /// When the spider was started
    pub started_at: DateTime<Utc>,
    /// When the output file was written
    pub finished_at: DateTime<Utc>,
}

/// Drives a single crawl on a remote scanner.
pub struct ScanOrchestrator {
    /// Remote scanner API
    api: Arc<dyn ScannerApi>,
    /// Target, output and polling settings
    settings: ScanSettings,
}

impl ScanOrchestrator {
    /// Create a new scan orchestrator.
    #[must_use]
    pub fn new(api: Arc<dyn ScannerApi>, settings: ScanSettings) -> Self {
        Self { api, settings }
    }

    /// Replace the polling policy.
    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.settings.poll = poll;
        self
    }

    /// Run the whole scan: start, poll to completion, fetch, persist.
    ///
    /// Any failure ends the run at that step. Nothing is retried, and the
    /// output file is only touched once alerts have been fetched.
    pub async fn run(&self) -> Result<ScanOutcome> {
        let started_at = Utc::now();

        let scan_id = self.start_crawl().await?;
        let polls = self.wait_for_completion(&scan_id).await?;
        let alerts = self.fetch_alerts().await?;
        let risk_summary = RiskSummary::from_alerts(&alerts);
        let output_path = self.persist(&alerts).await?;

        tracing::info!(
            "Scan finished: {} alerts written to {}",
            alerts.len(),
            output_path.display()
        );
        tracing::info!("Alerts by risk: {}", risk_summary);

        Ok(ScanOutcome {
            scan_id,
            polls,
            alert_count: alerts.len(),
            risk_summary,
            output_path,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Ask the scanner to start spidering the target.
    pub async fn start_crawl(&self) -> Result<ScanId> {
        tracing::info!("Starting spider on: {}", self.settings.target);

        let scan_id = self.api.start_spider(&self.settings.target).await?;
        tracing::debug!("Spider started with scan id {}", scan_id);
        Ok(scan_id)
    }

    /// Poll the crawl until it reports 100%, returning the number of polls.
    ///
    /// Sleeps the poll interval before every status request. Stops at the
    /// first complete status, or fails once a configured bound is reached.
    pub async fn wait_for_completion(&self, scan_id: &ScanId) -> Result<u32> {
        let policy = &self.settings.poll;
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            if let Some(max_polls) = policy.max_polls {
                if polls >= max_polls {
                    tracing::warn!("Giving up on spider {} after {} polls", scan_id, polls);
                    return Err(ScanError::PollLimitExceeded {
                        scan_id: scan_id.clone(),
                        polls,
                    });
                }
            }

            if let Some(timeout) = policy.timeout {
                let elapsed = started.elapsed();
                // Never sleep past the deadline.
                if elapsed + policy.interval > timeout {
                    tracing::warn!("Giving up on spider {} after {:?}", scan_id, elapsed);
                    return Err(ScanError::PollTimeout {
                        scan_id: scan_id.clone(),
                        elapsed,
                    });
                }
            }

            tokio::time::sleep(policy.interval).await;

            let progress = self.api.spider_status(scan_id).await?;
            polls += 1;
            tracing::info!("Spider progress: {}", progress);

            if progress.is_complete() {
                return Ok(polls);
            }
        }
    }

    /// Fetch every alert raised under the target URL.
    pub async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>> {
        let alerts = self.api.alerts(&self.settings.target).await?;
        tracing::debug!(
            "Fetched {} alerts for {}",
            alerts.len(),
            self.settings.target
        );
        for alert in &alerts {
            tracing::debug!(
                "[{}] {} at {}",
                alert.risk().unwrap_or("?"),
                alert.name().unwrap_or("unnamed alert"),
                alert.url().unwrap_or("-")
            );
        }
        Ok(alerts)
    }

    /// Write alerts to the output path, replacing any previous file.
    pub async fn persist(&self, alerts: &[AlertRecord]) -> Result<PathBuf> {
        report::write_alerts(&self.settings.output_path, alerts).await?;
        Ok(self.settings.output_path.clone())
    }
}
