//! zaprun Core - Foundation crate for the zaprun scan driver.
//!
//! This crate provides the shared types, error handling and configuration
//! management that the client, scanner, uploader and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes (`ScanId`, `Progress`, `AlertRecord`)
//!
//! # Example
//!
//! ```rust
//! use zaprun_core::{AppConfig, Progress};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.scanner.base_url(), "http://127.0.0.1:9090");
//!
//! let progress: Progress = "100".parse()?;
//! assert!(progress.is_complete());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DojoConfig, ScanConfig, ScannerConfig};
pub use error::{ConfigError, ConfigResult, ZaprunError};
pub use types::{AlertRecord, Progress, ScanId};
