//! Descriptors exchanged between the GitHub and Jira sides

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A backport tracking board on GitHub Projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Project number within the organization
    pub number: u64,
    /// Board title
    pub title: String,
    /// Options of the board's "Status" field, in board order
    pub versions: Vec<String>,
}

/// A pull request queued on a backport board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDescriptor {
    /// PR number
    pub number: u64,
    /// PR URL, the identity of the descriptor
    pub url: String,
    /// PR title
    pub title: String,
    /// PR body as plain text
    pub description: String,
    /// Existing tracker tickets referencing this PR
    #[serde(default)]
    pub linked_tickets: Vec<TicketDescriptor>,
}

impl PullRequestDescriptor {
    /// Create a descriptor with no linked tickets
    pub fn new(
        number: u64,
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            number,
            url: url.into(),
            title: title.into(),
            description: description.into(),
            linked_tickets: Vec::new(),
        }
    }

    /// Link a ticket if it references this PR and is not linked yet
    ///
    /// Returns true when the ticket was added.
    pub fn link(&mut self, ticket: &TicketDescriptor) -> bool {
        if !ticket.references(&self.url) || self.linked_tickets.iter().any(|t| t.key == ticket.key)
        {
            return false;
        }
        self.linked_tickets.push(ticket.clone());
        true
    }
}

/// A ticket found in the issue tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDescriptor {
    /// Ticket key, e.g. QUARKUS-6834
    pub key: String,
    /// Browseable URL of the ticket
    pub url: String,
    /// Pull request URLs recorded on the ticket
    pub linked_pull_request_urls: BTreeSet<String>,
}

impl TicketDescriptor {
    /// Whether the ticket records the given pull request URL
    pub fn references(&self, pr_url: &str) -> bool {
        self.linked_pull_request_urls.contains(pr_url)
    }
}
