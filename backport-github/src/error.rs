//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// The GraphQL endpoint reported errors for the query
    #[error("GraphQL query failed: {0}")]
    QueryExecution(String),

    /// No project data was readable at all
    #[error(
        "No projects readable in organization '{organization}'. Check that the token has the \
         read:project scope and that you are a member of the organization"
    )]
    NoAccessibleProjects { organization: String },

    /// The requested board does not exist or is not readable
    #[error("Project #{number} not found in organization '{organization}'")]
    ProjectNotFound { organization: String, number: u64 },

    /// Invalid project name pattern
    #[error("Invalid project name pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
