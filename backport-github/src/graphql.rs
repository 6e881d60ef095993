//! GitHub GraphQL API plumbing
//!
//! The executor hands back the raw response. Callers go through
//! [`GraphQlResponse::into_data`] so that reported errors are looked at
//! before any payload is interpreted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{Error, Result};

/// A query document plus its variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlQuery {
    #[serde(rename = "query")]
    pub document: String,
    pub variables: Value,
}

/// GraphQL query response wrapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// GraphQL error
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub path: Vec<Value>,
}

impl GraphQlError {
    /// A single node inside returned data was nulled because the token may not read it
    fn is_node_permission_gap(&self) -> bool {
        self.kind.as_deref() == Some("FORBIDDEN") && self.path.len() > 1
    }
}

impl GraphQlResponse {
    /// Check the reported errors, then hand out the payload
    ///
    /// Per-node `FORBIDDEN` errors next to returned data are tolerated: the
    /// affected nodes come back as `null` and consumers count them. Any other
    /// error fails the whole query. `Ok(None)` means the payload was absent.
    pub fn into_data(self) -> Result<Option<Value>> {
        let has_data = self.data.as_ref().is_some_and(|d| !d.is_null());
        let (tolerated, fatal): (Vec<_>, Vec<_>) = self
            .errors
            .into_iter()
            .partition(|e| has_data && e.is_node_permission_gap());

        if !fatal.is_empty() {
            let messages: Vec<String> = fatal.into_iter().map(|e| e.message).collect();
            return Err(Error::QueryExecution(messages.join(", ")));
        }

        for error in &tolerated {
            debug!(message = %error.message, path = ?error.path, "Ignoring inaccessible node");
        }

        Ok(self.data.filter(|d| !d.is_null()))
    }
}

/// Something that can run GraphQL queries against GitHub
#[async_trait]
pub trait GraphQlExecutor: Send + Sync {
    /// Run one query and return the raw response
    async fn execute(&self, query: &GraphQlQuery) -> Result<GraphQlResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> GraphQlResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_clean_response() {
        let data = response(json!({"data": {"organization": null}}))
            .into_data()
            .unwrap();
        assert_eq!(data, Some(json!({"organization": null})));
    }

    #[test]
    fn test_null_data_is_absent() {
        assert_eq!(response(json!({"data": null})).into_data().unwrap(), None);
        assert_eq!(response(json!({})).into_data().unwrap(), None);
    }

    #[test]
    fn test_errors_are_concatenated() {
        let err = response(json!({
            "data": null,
            "errors": [
                {"message": "Field 'x' doesn't exist"},
                {"message": "Variable $organization is required"}
            ]
        }))
        .into_data()
        .unwrap_err();

        match err {
            Error::QueryExecution(msg) => {
                assert_eq!(
                    msg,
                    "Field 'x' doesn't exist, Variable $organization is required"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_node_permission_gap_tolerated() {
        let data = response(json!({
            "data": {
                "organization": {"projectsV2": {"nodes": [null, {"title": "Backports 3.20"}]}}
            },
            "errors": [{
                "type": "FORBIDDEN",
                "message": "Resource not accessible by integration",
                "path": ["organization", "projectsV2", "nodes", 0]
            }]
        }))
        .into_data()
        .unwrap();
        assert!(data.is_some());
    }

    #[test]
    fn test_forbidden_without_data_is_fatal() {
        let result = response(json!({
            "data": null,
            "errors": [{
                "type": "FORBIDDEN",
                "message": "nope",
                "path": ["organization", "projectV2"]
            }]
        }))
        .into_data();
        assert!(matches!(result, Err(Error::QueryExecution(_))));
    }

    #[test]
    fn test_query_serializes_as_request_body() {
        let query = GraphQlQuery {
            document: "query { viewer { login } }".to_string(),
            variables: json!({}),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"query": "query { viewer { login } }", "variables": {}})
        );
    }
}
