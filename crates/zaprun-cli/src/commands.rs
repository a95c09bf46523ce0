//! Subcommand implementations.

use crate::cli::ScanArgs;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zaprun_client::ZapClient;
use zaprun_core::AppConfig;
use zaprun_dojo::{DojoClient, UploadStatus};
use zaprun_scanner::{ScanOrchestrator, ScanSettings};

/// Run one spider scan and write its alerts.
pub async fn scan(mut config: AppConfig, args: &ScanArgs) -> Result<()> {
    args.apply(&mut config.scan);
    config.validate().context("invalid scan settings")?;

    let client = ZapClient::new(&config.scanner)?;
    info!("Using scanner at {}", client.base_url());

    let settings = ScanSettings::from_config(&config.scan);
    let orchestrator = ScanOrchestrator::new(Arc::new(client), settings);
    let outcome = orchestrator
        .run()
        .await
        .with_context(|| format!("scan of {} failed", config.scan.target))?;

    debug!(
        "Spider {} completed after {} polls in {}s",
        outcome.scan_id,
        outcome.polls,
        (outcome.finished_at - outcome.started_at).num_seconds()
    );
    Ok(())
}

/// Upload report files to DefectDojo.
///
/// Missing files are skipped with a warning; any rejected upload makes the
/// command fail after the whole batch has been attempted.
pub async fn upload(config: &AppConfig, files: &[PathBuf]) -> Result<()> {
    let client = DojoClient::new(&config.defectdojo)?;
    let results = client.upload_all(files).await;

    let failed = results
        .iter()
        .filter(|r| matches!(r.status, UploadStatus::Failed(_)))
        .count();
    let skipped = results
        .iter()
        .filter(|r| r.status == UploadStatus::Skipped)
        .count();

    if skipped > 0 {
        warn!("{} of {} files skipped", skipped, results.len());
    }
    if failed > 0 {
        bail!("{} of {} uploads failed", failed, results.len());
    }
    Ok(())
}

/// Print the effective configuration.
pub fn show_config(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
