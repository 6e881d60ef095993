//! GraphQL query documents for GitHub Projects (v2)

use serde_json::json;

use crate::GraphQlQuery;

const PROJECT_DISCOVERY: &str = r#"
query ($organization: String!) {
  organization(login: $organization) {
    projectsV2(first: 100) {
      nodes {
        title
        number
        field(name: "Status") {
          ... on ProjectV2SingleSelectField {
            options {
              id
              name
            }
          }
        }
      }
    }
  }
}
"#;

const PULL_REQUEST_PAGE: &str = r#"
query ($organization: String!, $projectNumber: Int!) {
  organization(login: $organization) {
    projectV2(number: $projectNumber) {
      items(first: 100@AFTER@) {
        nodes {
          fieldValueByName(name: "Status") {
            ... on ProjectV2ItemFieldSingleSelectValue {
              name
            }
          }
          content {
            ... on PullRequest {
              url
              title
              number
              bodyText
            }
          }
        }
        pageInfo {
          endCursor
          hasNextPage
        }
      }
    }
  }
}
"#;

/// Boards of an organization with the options of their "Status" field
///
/// Only the first 100 boards are requested.
pub fn project_discovery(organization: &str) -> GraphQlQuery {
    GraphQlQuery {
        document: PROJECT_DISCOVERY.to_string(),
        variables: json!({ "organization": organization }),
    }
}

/// One page of items on a board, starting after `after` when given
pub fn pull_request_page(
    organization: &str,
    project_number: u64,
    after: Option<&str>,
) -> GraphQlQuery {
    // a JSON string is a valid GraphQL string literal
    let after_arg = after
        .map(|cursor| format!(", after: {}", serde_json::Value::from(cursor)))
        .unwrap_or_default();

    GraphQlQuery {
        document: PULL_REQUEST_PAGE.replace("@AFTER@", &after_arg),
        variables: json!({
            "organization": organization,
            "projectNumber": project_number,
        }),
    }
}
