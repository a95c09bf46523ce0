//! zaprun Client - Remote API access to the scanner daemon.
//!
//! The orchestrator only ever talks to the [`ScannerApi`] trait. [`ZapClient`]
//! implements it against the daemon's JSON API over HTTP, and
//! [`mock::ScriptedScanner`] implements it in memory for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use zaprun_client::{ScannerApi, ZapClient};
//! use zaprun_core::ScannerConfig;
//!
//! let client = ZapClient::new(&ScannerConfig::default())?;
//! let scan_id = client.start_spider("http://www:80").await?;
//! let progress = client.spider_status(&scan_id).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod error;
pub mod mock;
pub mod zap;

// Re-export commonly used types
pub use api::ScannerApi;
pub use error::{ClientError, Result};
pub use zap::ZapClient;
