//! Error types for the backport importer

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A ticket was requested for a pull request that was never fetched
    #[error(
        "No pull request #{0} found in the cache; list the pull requests for its fix version first"
    )]
    MissingCacheEntry(u64),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
