//! Backport Jira - Jira side of the backport importer
//!
//! This crate finds tickets that already reference backported pull
//! requests and creates new tickets for the ones that have none.

mod client;
mod correlate;
mod create;
mod error;
pub mod jql;
mod pager;
mod tracker;
mod versions;

pub use client::JiraClient;
pub use correlate::IssueCorrelator;
pub use create::{IssueCreator, IssueType};
pub use error::{Error, Result};
pub use pager::{fetch_all_by_offset, SEARCH_PAGE_SIZE};
pub use tracker::{CreateIssueRequest, TrackerIssue, TrackerSearch, TrackerVersions, TrackerWriter};
pub use versions::list_fix_versions;

/// Browseable URL of a ticket
pub fn browse_url(server: &str, key: &str) -> String {
    format!("{}/browse/{}", server.trim_end_matches('/'), key)
}
