//! Error types for scanner API access.

use thiserror::Error;

/// Errors that can occur while talking to the scanner daemon.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The daemon answered with a non-success status
    #[error("API error ({endpoint}): status {status}, {message}")]
    Api {
        /// API endpoint that failed, e.g. `spider/action/scan`
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The daemon answered, but not with what the endpoint promises
    #[error("failed to parse response from {endpoint}: {message}")]
    Parse {
        /// API endpoint whose response was malformed
        endpoint: String,
        /// What was wrong with it
        message: String,
    },

    /// Internal error (client construction)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClientError {
    pub(crate) fn parse(endpoint: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
