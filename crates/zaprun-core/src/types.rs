//! Shared types used across zaprun.
//!
//! The scanner daemon owns the shape of everything it returns. These types
//! only wrap what the orchestrator has to reason about (an id to correlate
//! polls, a completion percentage) and otherwise pass data through untouched.

use crate::error::ZaprunError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a crawl started on the scanner daemon.
///
/// The daemon hands out short numeric strings, but nothing here relies on
/// that; the only requirement is that the id is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(String);

impl ScanId {
    /// Create a new `ScanId` from a string.
    ///
    /// # Errors
    /// Returns error if the id is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, ZaprunError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ZaprunError::Validation(
                "scan id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Crawl completion percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Progress(u8);

impl Progress {
    /// Progress value reported once the crawl has finished.
    pub const COMPLETE: Progress = Progress(100);

    /// Create a `Progress` from a percentage.
    ///
    /// # Errors
    /// Returns error if the value is above 100.
    pub fn new(percent: u8) -> Result<Self, ZaprunError> {
        if percent > 100 {
            return Err(ZaprunError::Validation(format!(
                "progress must be between 0 and 100, got {percent}"
            )));
        }
        Ok(Self(percent))
    }

    /// Percentage value.
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    /// True once the crawl reports exactly 100%.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl FromStr for Progress {
    type Err = ZaprunError;

    /// Parse the string-encoded percentage the daemon reports (`"40"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let percent: u8 = s.trim().parse().map_err(|_| {
            ZaprunError::Validation(format!("progress is not a percentage: '{s}'"))
        })?;
        Self::new(percent)
    }
}

impl TryFrom<u8> for Progress {
    type Error = ZaprunError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for u8 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One finding reported by the scanner, kept exactly as received.
///
/// The record is a JSON object whose schema belongs to the daemon. Key order
/// and number literals are preserved so that writing the record back out
/// reproduces the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertRecord(Map<String, Value>);

impl AlertRecord {
    /// Alert title, when the record carries one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str_field("name").or_else(|| self.str_field("alert"))
    }

    /// Risk label (`High`, `Medium`, `Low`, `Informational`), when present.
    #[must_use]
    pub fn risk(&self) -> Option<&str> {
        self.str_field("risk")
    }

    /// URL the finding was raised against, when present.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}
