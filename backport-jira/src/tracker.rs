//! Contracts of the Jira collaborators

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::Result;

/// An issue as returned by a search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerIssue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl TrackerIssue {
    /// Raw value of a (custom) field
    pub fn field(&self, id: &str) -> Option<&Value> {
        self.fields.get(id).filter(|v| !v.is_null())
    }
}

/// Everything a new ticket is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    pub project_key: String,
    pub summary: String,
    pub issue_type_id: u64,
    pub description: String,
    pub pull_request_field_id: String,
    pub pull_request_url: String,
    pub fix_version: String,
    pub component: String,
    pub assignee: String,
}

impl CreateIssueRequest {
    /// Body of `POST /rest/api/2/issue`
    pub fn to_payload(&self) -> Value {
        let mut fields = json!({
            "project": { "key": self.project_key },
            "summary": self.summary,
            "issuetype": { "id": self.issue_type_id.to_string() },
            "description": self.description,
            "fixVersions": [{ "name": self.fix_version }],
            "components": [{ "name": self.component }],
            "assignee": { "name": self.assignee },
        });
        fields[self.pull_request_field_id.as_str()] = Value::from(self.pull_request_url.as_str());
        json!({ "fields": fields })
    }
}

/// Paged JQL search
#[async_trait]
pub trait TrackerSearch: Send + Sync {
    /// Fetch at most `page_size` issues starting at `offset`
    async fn search(&self, jql: &str, page_size: usize, offset: usize) -> Result<Vec<TrackerIssue>>;
}

/// Ticket creation and workflow transitions
#[async_trait]
pub trait TrackerWriter: Send + Sync {
    /// Create a ticket and return its key
    async fn create_issue(&self, request: &CreateIssueRequest) -> Result<String>;

    /// Move a ticket through a workflow transition
    async fn transition(&self, key: &str, transition_id: u64) -> Result<()>;
}

/// Version names of a project
#[async_trait]
pub trait TrackerVersions: Send + Sync {
    async fn project_versions(&self, project_key: &str) -> Result<Vec<String>>;
}
