//! Error types for Jira operations

use std::time::Duration;

use thiserror::Error;

/// Result type for Jira operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during Jira operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error
    #[error("Jira request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication error
    #[error("Jira authentication error: {0}")]
    Auth(String),

    /// Jira rejected the request
    #[error("Jira query failed: {0}")]
    QueryExecution(String),

    /// No answer within the configured timeout
    #[error("Jira did not answer within {0:?}")]
    Timeout(Duration),

    /// Issue type tag not in bug/upgrade/feature
    #[error("Unknown issue type: {0}")]
    UnknownIssueType(String),

    /// Missing or unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid server URL
    #[error("Invalid Jira URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
