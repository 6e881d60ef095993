//! Backport GitHub - GitHub Projects access for the backport importer
//!
//! This crate discovers backport boards of an organization and lists the
//! pull requests queued on a board for a given fix version, using the
//! GitHub GraphQL API.

mod client;
mod error;
pub mod graphql;
mod pager;
mod projects;
mod pull_requests;
pub mod queries;

pub use client::GitHubClient;
pub use error::{Error, Result};
pub use graphql::{GraphQlError, GraphQlExecutor, GraphQlQuery, GraphQlResponse};
pub use pager::{fetch_all_by_cursor, Connection, PageInfo};
pub use projects::{list_backport_projects, ProjectListing};
pub use pull_requests::list_pull_requests_for_fix_version;
