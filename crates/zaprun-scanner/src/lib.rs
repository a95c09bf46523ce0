//! zaprun Scanner - Crawl orchestration against a remote scanner daemon.
//!
//! This crate sequences one scan: start a spider on the target, poll its
//! progress at a fixed interval until it reports 100%, fetch the alerts the
//! daemon raised for the target, and write them to disk as pretty-printed
//! JSON. Every step is awaited before the next one starts.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zaprun_client::ZapClient;
//! use zaprun_scanner::{ScanOrchestrator, ScanSettings};
//!
//! let config = zaprun_core::AppConfig::load_with_env(None)?;
//! let client = Arc::new(ZapClient::new(&config.scanner)?);
//! let orchestrator = ScanOrchestrator::new(client, ScanSettings::from_config(&config.scan));
//!
//! let outcome = orchestrator.run().await?;
//! println!("{} alerts written to {}", outcome.alert_count, outcome.output_path.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod orchestrator;
pub mod report;

// Re-export commonly used types
pub use error::{Result, ScanError};
pub use orchestrator::{PollPolicy, ScanOrchestrator, ScanOutcome, ScanSettings};
pub use report::{write_alerts, RiskSummary};
