//! Backport Core - shared building blocks for the backport importer
//!
//! This crate holds the data model exchanged between the GitHub and Jira
//! sides, fix-version handling, configuration, secrets and the
//! request-scoped pull request cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod secrets;
pub mod version;

pub use cache::PullRequestCache;
pub use config::{Config, GitHubConfig, IssueTypeIds, JiraConfig};
pub use error::{Error, Result};
pub use model::{ProjectDescriptor, PullRequestDescriptor, TicketDescriptor};
pub use secrets::Secrets;
pub use version::FixVersion;
