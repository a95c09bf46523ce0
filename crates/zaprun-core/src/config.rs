//! Configuration management for zaprun.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Every section is `#[serde(default)]`, so a
//! partial file (or no file at all) yields a working setup that talks to a
//! local scanner daemon on port 9090.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const REDACTED: &str = "<redacted>";

/// Main application configuration.
///
/// Loaded from `~/.config/zaprun/config.toml` (or platform equivalent) unless
/// an explicit path is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Connection to the remote scanner daemon
    pub scanner: ScannerConfig,
    /// Crawl target, output and polling behavior
    pub scan: ScanConfig,
    /// DefectDojo report import settings
    pub defectdojo: DojoConfig,
}

impl AppConfig {
    /// Load configuration from the XDG path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration and apply environment variable overrides.
    ///
    /// `path` selects an explicit config file; `None` uses the XDG location.
    /// The result is validated before it is returned.
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Supports the following variables:
    /// - `ZAPRUN_HOST`: scanner daemon host
    /// - `ZAPRUN_PORT`: scanner daemon port
    /// - `ZAPRUN_API_KEY`: scanner API key
    /// - `ZAPRUN_TARGET`: crawl target URL
    /// - `DEFECTDOJO_API_URL`, `DEFECTDOJO_API_KEY`, `DEFECTDOJO_ENGAGEMENT_ID`
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ZAPRUN_HOST") {
            tracing::debug!("Override scanner.host from env: {}", host);
            self.scanner.host = host;
        }

        if let Some(val) = lookup("ZAPRUN_PORT") {
            match val.parse() {
                Ok(port) => {
                    self.scanner.port = port;
                    tracing::debug!("Override scanner.port from env: {}", port);
                }
                Err(_) => tracing::warn!("Ignoring unparsable ZAPRUN_PORT value '{}'", val),
            }
        }

        if let Some(key) = lookup("ZAPRUN_API_KEY") {
            tracing::debug!("Override scanner.api_key from env");
            self.scanner.api_key = key;
        }

        if let Some(target) = lookup("ZAPRUN_TARGET") {
            tracing::debug!("Override scan.target from env: {}", target);
            self.scan.target = target;
        }

        if let Some(url) = lookup("DEFECTDOJO_API_URL") {
            self.defectdojo.api_url = Some(url);
        }
        if let Some(key) = lookup("DEFECTDOJO_API_KEY") {
            self.defectdojo.api_key = Some(key);
        }
        if let Some(id) = lookup("DEFECTDOJO_ENGAGEMENT_ID") {
            self.defectdojo.engagement_id = Some(id);
        }
    }

    /// Check values that would otherwise fail late, mid-scan.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanner.host.trim().is_empty() {
            return Err(invalid("scanner.host", "must not be empty"));
        }
        if self.scanner.port == 0 {
            return Err(invalid("scanner.port", "must be non-zero"));
        }
        if self.scanner.request_timeout_secs == 0 {
            return Err(invalid("scanner.request_timeout_secs", "must be at least 1"));
        }
        if self.scan.target.trim().is_empty() {
            return Err(invalid("scan.target", "must not be empty"));
        }
        if self.scan.poll_interval_secs == 0 {
            return Err(invalid("scan.poll_interval_secs", "must be at least 1"));
        }
        if self.scan.max_polls == Some(0) {
            return Err(invalid("scan.max_polls", "must be at least 1 when set"));
        }
        if self.scan.timeout_secs == Some(0) {
            return Err(invalid("scan.timeout_secs", "must be at least 1 when set"));
        }
        Ok(())
    }

    /// Render the configuration as TOML with every API key masked.
    pub fn to_redacted_toml(&self) -> ConfigResult<String> {
        let mut shown = self.clone();
        shown.scanner.api_key = REDACTED.to_string();
        if shown.defectdojo.api_key.is_some() {
            shown.defectdojo.api_key = Some(REDACTED.to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/zaprun/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "zaprun", "zaprun").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Remote scanner daemon connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Daemon host name or IP
    pub host: String,
    /// Daemon API port
    pub port: u16,
    /// Static API key configured on the daemon
    pub api_key: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ScannerConfig {
    /// Base URL of the daemon's API, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
            api_key: "changeme".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Crawl target and polling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// URL to spider; also the base URL alerts are scoped to
    pub target: String,
    /// File the alert list is written to (overwritten on every run)
    pub output_path: PathBuf,
    /// Fixed delay between status polls in seconds
    pub poll_interval_secs: u64,
    /// Give up after this many polls (unset = poll until complete)
    pub max_polls: Option<u32>,
    /// Give up after this many seconds of polling (unset = no limit)
    pub timeout_secs: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: "http://www:80".to_string(),
            output_path: PathBuf::from("zap_alerts.json"),
            poll_interval_secs: 3,
            max_polls: None,
            timeout_secs: None,
        }
    }
}

/// DefectDojo report import settings.
///
/// All three values are required by the uploader; they are optional here so
/// that scan-only setups need no DefectDojo section at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DojoConfig {
    /// DefectDojo base URL, e.g. `https://dojo.example.com`
    pub api_url: Option<String>,
    /// API v2 token
    pub api_key: Option<String>,
    /// Engagement the reports are imported into
    pub engagement_id: Option<String>,
}
