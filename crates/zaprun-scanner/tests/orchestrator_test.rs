//! Orchestration contract tests against a scripted scanner.
//!
//! Tokio's clock is paused, so the fixed poll interval costs no wall time
//! and elapsed virtual time can be asserted exactly.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;
use zaprun_client::mock::{Call, ScriptedScanner};
use zaprun_client::ClientError;
use zaprun_core::AlertRecord;
use zaprun_scanner::{PollPolicy, ScanError, ScanOrchestrator, ScanSettings};

const TARGET: &str = "http://www:80";

fn settings(output_path: PathBuf) -> ScanSettings {
    ScanSettings {
        target: TARGET.to_string(),
        output_path,
        poll: PollPolicy::default(),
    }
}

fn orchestrator(scanner: &Arc<ScriptedScanner>, output_path: PathBuf) -> ScanOrchestrator {
    ScanOrchestrator::new(scanner.clone(), settings(output_path))
}

/// Alerts as the daemon sends them, already in the pretty-printed layout the
/// output file uses. Keys are deliberately unsorted and the last record
/// carries number literals a float round trip would rewrite.
const RAW_ALERTS: &str = r#"[
  {
    "sourceid": "3",
    "other": "",
    "method": "GET",
    "evidence": "",
    "pluginId": "10020",
    "cweid": "1021",
    "confidence": "Medium",
    "alert": "Missing Anti-clickjacking Header",
    "risk": "Medium",
    "url": "http://www:80/",
    "tags": {
      "OWASP_2021_A05": "https://owasp.org/Top10/A05_2021/"
    }
  },
  {
    "risk": "Informational",
    "alert": "Modern Web Application",
    "url": "http://www:80/app",
    "messageId": "12",
    "id": "1"
  },
  {
    "zz": [
      3,
      2,
      1
    ],
    "alert": "Cookie without SameSite Attribute",
    "risk": "Low",
    "aa": null,
    "confidence": 1.50,
    "big": 123456789012345678901234,
    "e": 1e2
  }
]"#;

fn sample_alerts() -> Vec<AlertRecord> {
    serde_json::from_str(RAW_ALERTS).expect("parse alerts")
}

fn read_output(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read output file")
}

#[tokio::test(start_paused = true)]
async fn test_polling_stops_exactly_at_first_complete() {
    let scripts: Vec<Vec<u8>> = vec![
        vec![100],
        vec![0, 100],
        vec![5, 5, 5, 5, 100],
        vec![99, 100, 40, 100],
        vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100],
    ];

    for script in scripts {
        let expected = script.iter().position(|p| *p == 100).expect("script completes") + 1;
        let tmp = TempDir::new().expect("create temp dir");
        let scanner = Arc::new(ScriptedScanner::new().with_progress(script.clone()));

        let outcome = orchestrator(&scanner, tmp.path().join("alerts.json"))
            .run()
            .await
            .expect("run scan");

        assert_eq!(outcome.polls as usize, expected, "script: {script:?}");
        assert_eq!(scanner.status_calls(), expected, "script: {script:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_four_polls_at_fixed_interval() {
    let tmp = TempDir::new().expect("create temp dir");
    let scanner = Arc::new(ScriptedScanner::new().with_progress([0, 40, 80, 100]));
    let orchestrator = orchestrator(&scanner, tmp.path().join("alerts.json"));

    let start = Instant::now();
    let scan_id = orchestrator.start_crawl().await.expect("start crawl");
    let polls = orchestrator
        .wait_for_completion(&scan_id)
        .await
        .expect("wait for completion");

    assert_eq!(polls, 4);
    assert_eq!(scanner.status_calls(), 4);
    // One constant 3 s sleep before each poll.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(12), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(13), "elapsed: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_output_matches_fetched_alerts_verbatim() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("zap_alerts.json");
    let alerts = sample_alerts();
    let scanner = Arc::new(
        ScriptedScanner::new()
            .with_progress([20, 100])
            .with_alerts(alerts.clone()),
    );

    let outcome = orchestrator(&scanner, output.clone())
        .run()
        .await
        .expect("run scan");

    assert_eq!(outcome.alert_count, 3);
    assert_eq!(outcome.output_path, output);
    assert_eq!(outcome.risk_summary.medium, 1);
    assert_eq!(outcome.risk_summary.low, 1);
    assert_eq!(outcome.risk_summary.informational, 1);

    // Byte-for-byte what the daemon sent: key order and number literals kept.
    let written = read_output(&output);
    assert_eq!(written, RAW_ALERTS);
    assert!(written.contains("\"confidence\": 1.50,"));
    assert!(written.contains("\"big\": 123456789012345678901234,"));
    assert!(written.contains("\"e\": 1e2\n"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_start_stops_everything() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("alerts.json");
    let scanner = Arc::new(ScriptedScanner::failing_start());

    let err = orchestrator(&scanner, output.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScanError::Client(ClientError::Api { status: 400, .. })
    ));
    assert_eq!(scanner.calls(), [Call::StartSpider(TARGET.to_string())]);
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn test_empty_alerts_still_written() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("alerts.json");
    let scanner = Arc::new(ScriptedScanner::new().with_alerts(Vec::new()));

    let outcome = orchestrator(&scanner, output.clone())
        .run()
        .await
        .expect("run scan");

    assert_eq!(outcome.alert_count, 0);
    assert_eq!(read_output(&output), "[]");
}

#[tokio::test(start_paused = true)]
async fn test_rerun_overwrites_existing_output() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("alerts.json");
    std::fs::write(&output, "stale content from a previous run that is much longer\n".repeat(50))
        .expect("seed output file");

    let scanner = Arc::new(ScriptedScanner::new().with_alerts(sample_alerts()));
    let orchestrator = orchestrator(&scanner, output.clone());

    orchestrator.run().await.expect("first run");
    let first = read_output(&output);
    assert!(!first.contains("stale content"));

    orchestrator.run().await.expect("second run");
    assert_eq!(read_output(&output), first);
}

#[tokio::test(start_paused = true)]
async fn test_scan_id_and_target_are_correlated() {
    let tmp = TempDir::new().expect("create temp dir");
    let scanner = Arc::new(
        ScriptedScanner::new()
            .with_scan_id("17")
            .with_progress([50, 100]),
    );

    let outcome = orchestrator(&scanner, tmp.path().join("alerts.json"))
        .run()
        .await
        .expect("run scan");

    assert_eq!(outcome.scan_id.as_str(), "17");
    assert_eq!(
        scanner.calls(),
        [
            Call::StartSpider(TARGET.to_string()),
            Call::SpiderStatus("17".to_string()),
            Call::SpiderStatus("17".to_string()),
            Call::Alerts(TARGET.to_string()),
        ]
    );
    assert!(outcome.finished_at >= outcome.started_at);
}

#[tokio::test(start_paused = true)]
async fn test_max_polls_bound() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("alerts.json");
    let scanner = Arc::new(ScriptedScanner::new().with_progress([10]));

    let err = orchestrator(&scanner, output.clone())
        .with_poll_policy(PollPolicy {
            max_polls: Some(5),
            ..PollPolicy::default()
        })
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::PollLimitExceeded { polls: 5, .. }));
    assert_eq!(scanner.status_calls(), 5);
    assert!(!scanner.calls().iter().any(|c| matches!(c, Call::Alerts(_))));
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn test_max_polls_not_hit_when_complete_on_last_allowed_poll() {
    let tmp = TempDir::new().expect("create temp dir");
    let scanner = Arc::new(ScriptedScanner::new().with_progress([10, 50, 100]));

    let outcome = orchestrator(&scanner, tmp.path().join("alerts.json"))
        .with_poll_policy(PollPolicy {
            max_polls: Some(3),
            ..PollPolicy::default()
        })
        .run()
        .await
        .expect("run scan");

    assert_eq!(outcome.polls, 3);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_bound() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("alerts.json");
    let scanner = Arc::new(ScriptedScanner::new().with_progress([0]));

    let start = Instant::now();
    let err = orchestrator(&scanner, output.clone())
        .with_poll_policy(PollPolicy {
            timeout: Some(Duration::from_secs(10)),
            ..PollPolicy::default()
        })
        .run()
        .await
        .unwrap_err();

    // Polls at 3 s, 6 s and 9 s; a fourth sleep would end past 10 s.
    assert!(matches!(err, ScanError::PollTimeout { .. }));
    assert_eq!(scanner.status_calls(), 3);
    assert!(start.elapsed() <= Duration::from_secs(10));
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn test_failed_alert_fetch_writes_nothing() {
    let tmp = TempDir::new().expect("create temp dir");
    let output = tmp.path().join("alerts.json");
    let scanner = Arc::new(ScriptedScanner::new().failing_alerts());

    let err = orchestrator(&scanner, output.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Client(ClientError::Api { status: 500, .. })));
    assert!(!output.exists());
}
