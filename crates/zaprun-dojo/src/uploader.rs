//! DefectDojo `import-scan` client.

use crate::error::{DojoError, Result};
use crate::scan_type::determine_scan_type;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zaprun_core::DojoConfig;

const IMPORT_SCAN_PATH: &str = "/api/v2/import-scan/";

/// Request timeout for report imports.
const UPLOAD_TIMEOUT_SECS: u64 = 120;

/// Client for importing reports into one DefectDojo engagement.
#[derive(Debug, Clone)]
pub struct DojoClient {
    client: Client,
    api_url: String,
    api_key: String,
    engagement_id: String,
}

/// Outcome of one file in a batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Report file
    pub path: PathBuf,
    /// Scan type the report was (or would have been) imported as
    pub scan_type: &'static str,
    /// What happened to it
    pub status: UploadStatus,
}

/// Per-file upload status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// Imported (HTTP 201)
    Uploaded,
    /// Not attempted because the file does not exist
    Skipped,
    /// Attempted and failed
    Failed(String),
}

impl UploadResult {
    /// True if the report was imported.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Uploaded
    }
}

impl DojoClient {
    /// Create a client from the `[defectdojo]` configuration section.
    ///
    /// # Errors
    /// Returns `MissingSetting` if the URL, key or engagement is unset.
    pub fn new(config: &DojoConfig) -> Result<Self> {
        let api_url = config
            .api_url
            .clone()
            .ok_or(DojoError::MissingSetting("DEFECTDOJO_API_URL"))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or(DojoError::MissingSetting("DEFECTDOJO_API_KEY"))?;
        let engagement_id = config
            .engagement_id
            .clone()
            .ok_or(DojoError::MissingSetting("DEFECTDOJO_ENGAGEMENT_ID"))?;

        Self::with_settings(api_url, api_key, engagement_id)
    }

    /// Create a client from explicit settings.
    pub fn with_settings(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        engagement_id: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            engagement_id: engagement_id.into(),
        })
    }

    fn import_url(&self) -> String {
        format!("{}{IMPORT_SCAN_PATH}", self.api_url)
    }

    /// Import a single report as `scan_type`.
    pub async fn upload(&self, path: &Path, scan_type: &str) -> Result<()> {
        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DojoError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = Part::bytes(contents)
            .file_name(file_name)
            .mime_str("application/json")?;

        let form = Form::new()
            .text("engagement", self.engagement_id.clone())
            .text("scan_type", scan_type.to_string())
            .text("active", "true")
            .text("verified", "true")
            .text("scan_date", "")
            .text("lead", "")
            .text("tags", "")
            .part("file", file);

        let response = self
            .client
            .post(self.import_url())
            .header("Authorization", format!("Token {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            return Err(DojoError::Api {
                path: path.to_path_buf(),
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("Successfully uploaded {} as {}", path.display(), scan_type);
        Ok(())
    }

    /// Import each report in order, continuing past missing files and failures.
    pub async fn upload_all(&self, paths: &[PathBuf]) -> Vec<UploadResult> {
        let mut results = Vec::with_capacity(paths.len());

        for path in paths {
            let scan_type = determine_scan_type(path);

            let is_file = tokio::fs::metadata(path)
                .await
                .is_ok_and(|meta| meta.is_file());
            if !is_file {
                tracing::warn!("File not found: {}", path.display());
                results.push(UploadResult {
                    path: path.clone(),
                    scan_type,
                    status: UploadStatus::Skipped,
                });
                continue;
            }

            let status = match self.upload(path, scan_type).await {
                Ok(()) => UploadStatus::Uploaded,
                Err(e) => {
                    tracing::error!("{}", e);
                    UploadStatus::Failed(e.to_string())
                }
            };

            results.push(UploadResult {
                path: path.clone(),
                scan_type,
                status,
            });
        }

        results
    }
}
