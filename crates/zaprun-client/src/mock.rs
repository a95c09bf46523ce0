//! In-memory scanner for exercising orchestration without a daemon.

use crate::api::ScannerApi;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use zaprun_core::{AlertRecord, Progress, ScanId};

/// A recorded call against [`ScriptedScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `start_spider(url)`
    StartSpider(String),
    /// `spider_status(scan_id)`
    SpiderStatus(String),
    /// `alerts(base_url)`
    Alerts(String),
}

/// Scanner that replays a fixed progress script and alert list.
///
/// Progress values are handed out one per status call. Once the script runs
/// out, the last value repeats, so a script that never reaches 100 models a
/// crawl that never finishes.
pub struct ScriptedScanner {
    scan_id: String,
    progress: Mutex<VecDeque<u8>>,
    last_progress: Mutex<u8>,
    alerts: Vec<AlertRecord>,
    fail_start: bool,
    fail_alerts: bool,
    calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedScanner {
    /// Scanner whose crawl completes on the first poll and reports no alerts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scan_id: "0".to_string(),
            progress: Mutex::new(VecDeque::from([100])),
            last_progress: Mutex::new(0),
            alerts: Vec::new(),
            fail_start: false,
            fail_alerts: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Scanner that rejects the start call like a daemon with a wrong API key.
    #[must_use]
    pub fn failing_start() -> Self {
        let mut scanner = Self::new();
        scanner.fail_start = true;
        scanner
    }

    /// Replace the progress script.
    #[must_use]
    pub fn with_progress(self, script: impl IntoIterator<Item = u8>) -> Self {
        *self.progress.lock().expect("progress lock") = script.into_iter().collect();
        self
    }

    /// Replace the alert list returned by `alerts`.
    #[must_use]
    pub fn with_alerts(mut self, alerts: Vec<AlertRecord>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Replace the scan id handed out by `start_spider`.
    #[must_use]
    pub fn with_scan_id(mut self, scan_id: impl Into<String>) -> Self {
        self.scan_id = scan_id.into();
        self
    }

    /// Make the alerts call fail after the crawl completes.
    #[must_use]
    pub fn failing_alerts(mut self) -> Self {
        self.fail_alerts = true;
        self
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of status polls made so far.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::SpiderStatus(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl ScannerApi for ScriptedScanner {
    async fn start_spider(&self, url: &str) -> Result<ScanId> {
        self.record(Call::StartSpider(url.to_string()));

        if self.fail_start {
            return Err(ClientError::Api {
                endpoint: "spider/action/scan".to_string(),
                status: 400,
                message: "bad_api_key".to_string(),
            });
        }

        ScanId::new(self.scan_id.clone())
            .map_err(|e| ClientError::parse("spider/action/scan", e.to_string()))
    }

    async fn spider_status(&self, scan_id: &ScanId) -> Result<Progress> {
        self.record(Call::SpiderStatus(scan_id.as_str().to_string()));

        let mut last = self.last_progress.lock().expect("progress lock");
        if let Some(next) = self.progress.lock().expect("progress lock").pop_front() {
            *last = next;
        }

        Progress::new(*last).map_err(|e| ClientError::parse("spider/view/status", e.to_string()))
    }

    async fn alerts(&self, base_url: &str) -> Result<Vec<AlertRecord>> {
        self.record(Call::Alerts(base_url.to_string()));

        if self.fail_alerts {
            return Err(ClientError::Api {
                endpoint: "core/view/alerts".to_string(),
                status: 500,
                message: "internal error".to_string(),
            });
        }

        Ok(self.alerts.clone())
    }
}
