//! Linking backported pull requests to tickets that already reference them

use std::collections::{BTreeSet, HashSet};

use backport_core::{JiraConfig, PullRequestDescriptor, TicketDescriptor};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    browse_url, fetch_all_by_offset, jql, Error, Result, TrackerIssue, TrackerSearch,
    SEARCH_PAGE_SIZE,
};

/// Finds existing tickets for pull requests
pub struct IssueCorrelator<'a, S: ?Sized> {
    search: &'a S,
    config: &'a JiraConfig,
}

impl<'a, S> IssueCorrelator<'a, S>
where
    S: TrackerSearch + ?Sized,
{
    pub fn new(search: &'a S, config: &'a JiraConfig) -> Self {
        Self { search, config }
    }

    /// Tickets in the fix-version stream that reference any of `pr_urls`
    ///
    /// No search is issued for an empty URL list.
    pub async fn find_existing_tickets<'u, I>(
        &self,
        pr_urls: I,
        fix_version_wildcard: &str,
    ) -> Result<Vec<TicketDescriptor>>
    where
        I: IntoIterator<Item = &'u str>,
    {
        // without the field id every ticket would look unlinked
        if self.config.pull_request_field_id.trim().is_empty() {
            return Err(Error::Config(
                "jira.pull_request_field_id is not set".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let distinct = pr_urls.into_iter().filter(|url| seen.insert(*url));

        let Some(clause) = jql::ticket_search_clause(&self.config.pull_request_field_name, distinct)
        else {
            return Ok(Vec::new());
        };
        let query = jql::ticket_search_query(&self.config.project, fix_version_wildcard, &clause);
        debug!(jql = %query, "Searching existing tickets");

        let issues = fetch_all_by_offset(self.search, &query, SEARCH_PAGE_SIZE).await?;
        let tickets: Vec<TicketDescriptor> = issues
            .into_iter()
            .filter_map(|issue| self.ticket(issue))
            .collect();

        info!(count = tickets.len(), "Found existing tickets");
        Ok(tickets)
    }

    /// Attach every matching existing ticket to each pull request
    ///
    /// A pull request may end up with several tickets. Links already present
    /// are kept.
    pub async fn correlate(
        &self,
        mut pull_requests: Vec<PullRequestDescriptor>,
        fix_version_wildcard: &str,
    ) -> Result<Vec<PullRequestDescriptor>> {
        if pull_requests.is_empty() {
            return Ok(pull_requests);
        }

        let urls = pull_requests.iter().map(|pr| pr.url.as_str());
        let tickets = self.find_existing_tickets(urls, fix_version_wildcard).await?;

        for pr in &mut pull_requests {
            for ticket in &tickets {
                if pr.link(ticket) {
                    info!(ticket = %ticket.url, pr = %pr.url, "Linking existing ticket");
                }
            }
        }

        Ok(pull_requests)
    }

    fn ticket(&self, issue: TrackerIssue) -> Option<TicketDescriptor> {
        let urls = linked_urls(issue.field(&self.config.pull_request_field_id));
        if urls.is_empty() {
            warn!(key = %issue.key, "Ticket has no pull request link, ignoring");
            return None;
        }

        Some(TicketDescriptor {
            url: browse_url(&self.config.server, &issue.key),
            key: issue.key,
            linked_pull_request_urls: urls,
        })
    }
}

/// URLs stored in the pull request link field
fn linked_urls(value: Option<&Value>) -> BTreeSet<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(url)) if !url.trim().is_empty() => {
            BTreeSet::from([url.trim().to_string()])
        }
        _ => BTreeSet::new(),
    }
}
