//! Ticket creation for a backported pull request

use std::fmt;
use std::str::FromStr;

use backport_core::{IssueTypeIds, JiraConfig};
use tracing::{info, warn};

use crate::{browse_url, CreateIssueRequest, Error, Result, TrackerWriter};

const TESTING_SUMMARY_PREFIX: &str = "[TESTING, PLEASE IGNORE] ";
const TESTING_DESCRIPTION_PREFIX: &str =
    "IGNORE: this ticket was created by a test run of the backport importer\n\n";

/// Kind of ticket to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Bug,
    Upgrade,
    Feature,
}

impl IssueType {
    /// Jira issue type id configured for this kind
    pub fn id(self, ids: &IssueTypeIds) -> u64 {
        match self {
            IssueType::Bug => ids.bug,
            IssueType::Upgrade => ids.upgrade,
            IssueType::Feature => ids.feature,
        }
    }
}

impl FromStr for IssueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bug" => Ok(IssueType::Bug),
            "upgrade" => Ok(IssueType::Upgrade),
            "feature" => Ok(IssueType::Feature),
            other => Err(Error::UnknownIssueType(other.to_string())),
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueType::Bug => "bug",
            IssueType::Upgrade => "upgrade",
            IssueType::Feature => "feature",
        };
        f.write_str(name)
    }
}

/// Creates tickets for backported pull requests
pub struct IssueCreator<'a, W: ?Sized> {
    writer: &'a W,
    config: &'a JiraConfig,
    testing_run: bool,
}

impl<'a, W> IssueCreator<'a, W>
where
    W: TrackerWriter + ?Sized,
{
    pub fn new(writer: &'a W, config: &'a JiraConfig, testing_run: bool) -> Self {
        Self {
            writer,
            config,
            testing_run,
        }
    }

    /// Create a ticket and return its browseable URL
    ///
    /// `fix_version` is the Jira version name (e.g. `3.20.4.GA`), `issue_type`
    /// one of `bug`, `upgrade` or `feature`. When a transition is configured
    /// it is applied afterwards; a failed transition does not undo the ticket.
    pub async fn create_ticket(
        &self,
        pr_url: &str,
        pr_title: &str,
        fix_version: &str,
        issue_type: &str,
        description: &str,
    ) -> Result<String> {
        let issue_type: IssueType = issue_type.parse()?;
        let request = self.build_request(pr_url, pr_title, fix_version, issue_type, description);
        info!(
            summary = %request.summary,
            issue_type = %issue_type,
            fix_version = %request.fix_version,
            "Creating ticket"
        );

        let key = self.writer.create_issue(&request).await?;
        let url = browse_url(&self.config.server, &key);
        info!(key = %key, url = %url, "Created ticket");

        let transition = self.config.transition_to_state;
        if transition != 0 {
            if let Err(e) = self.writer.transition(&key, transition).await {
                warn!(key = %key, transition, error = %e, "Failed to transition new ticket");
            }
        }

        Ok(url)
    }

    fn build_request(
        &self,
        pr_url: &str,
        pr_title: &str,
        fix_version: &str,
        issue_type: IssueType,
        description: &str,
    ) -> CreateIssueRequest {
        let (summary, description) = if self.testing_run {
            (
                format!("{}{}", TESTING_SUMMARY_PREFIX, pr_title),
                format!("{}{}", TESTING_DESCRIPTION_PREFIX, description),
            )
        } else {
            (pr_title.to_string(), description.to_string())
        };

        CreateIssueRequest {
            project_key: self.config.project.clone(),
            summary,
            issue_type_id: issue_type.id(&self.config.issue_types),
            description,
            pull_request_field_id: self.config.pull_request_field_id.clone(),
            pull_request_url: pr_url.to_string(),
            fix_version: fix_version.to_string(),
            component: self.config.component.clone(),
            assignee: self.config.assignee.clone(),
        }
    }
}
