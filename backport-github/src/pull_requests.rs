//! Pull requests queued on a backport board

use std::collections::HashSet;

use backport_core::{FixVersion, PullRequestDescriptor};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{fetch_all_by_cursor, queries, Connection, Error, GraphQlExecutor, Result};

#[derive(Debug, Deserialize)]
struct ItemsData {
    organization: Option<OrganizationProject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationProject {
    project_v2: Option<ProjectItems>,
}

#[derive(Debug, Deserialize)]
struct ProjectItems {
    items: Connection<ItemNode>,
}

/// A board item; `content` is only filled for pull requests
#[derive(Debug, Deserialize)]
struct ItemNode {
    #[serde(rename = "fieldValueByName")]
    status: Option<StatusValue>,
    content: Option<ItemContent>,
}

#[derive(Debug, Deserialize)]
struct StatusValue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemContent {
    url: Option<String>,
    title: Option<String>,
    number: Option<u64>,
    body_text: Option<String>,
}

impl ItemNode {
    /// Value of the board's "Status" field
    fn status_name(&self) -> Option<&str> {
        self.status.as_ref()?.name.as_deref()
    }
}

/// List the pull requests on board `project_number` whose status is `fix_version`
///
/// Issues and draft items on the board are skipped, as are pull requests
/// without a status. The response order is kept.
pub async fn list_pull_requests_for_fix_version<E>(
    executor: &E,
    organization: &str,
    project_number: u64,
    fix_version: &FixVersion,
) -> Result<Vec<PullRequestDescriptor>>
where
    E: GraphQlExecutor + ?Sized,
{
    debug!(organization, project_number, fix_version = %fix_version, "Listing pull requests");

    let nodes = fetch_all_by_cursor(
        executor,
        |after| queries::pull_request_page(organization, project_number, after),
        |data| items_page(data, organization, project_number),
    )
    .await?;

    let inaccessible = nodes.iter().filter(|n| n.is_none()).count();
    if inaccessible > 0 {
        warn!(
            project_number,
            count = inaccessible,
            "Some project items were ignored because the token lacks permission to read them"
        );
    }

    let pull_requests = select_pull_requests(nodes.into_iter().flatten(), fix_version);
    info!(
        project_number,
        fix_version = %fix_version,
        count = pull_requests.len(),
        "Found pull requests"
    );

    Ok(pull_requests)
}

fn items_page(
    data: Option<Value>,
    organization: &str,
    number: u64,
) -> Result<Connection<ItemNode>> {
    let not_found = || Error::ProjectNotFound {
        organization: organization.to_string(),
        number,
    };

    let data: ItemsData = serde_json::from_value(data.ok_or_else(not_found)?)
        .map_err(|e| Error::Parse(format!("Failed to parse project items: {}", e)))?;

    data.organization
        .and_then(|org| org.project_v2)
        .map(|project| project.items)
        .ok_or_else(not_found)
}

fn select_pull_requests<I>(nodes: I, fix_version: &FixVersion) -> Vec<PullRequestDescriptor>
where
    I: IntoIterator<Item = ItemNode>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for node in nodes {
        if node.status_name() != Some(fix_version.as_str()) {
            continue;
        }
        let Some(content) = node.content else {
            continue;
        };
        // issues and drafts do not expose the PullRequest fields
        let Some(url) = content.url.filter(|u| !u.is_empty()) else {
            continue;
        };
        let Some(number) = content.number else {
            warn!(url = %url, "Pull request without a number, skipping");
            continue;
        };
        if !seen.insert(url.clone()) {
            debug!(url = %url, "Pull request listed twice, keeping the first");
            continue;
        }

        let pr = PullRequestDescriptor::new(
            number,
            url,
            content.title.unwrap_or_default(),
            content.body_text.unwrap_or_default(),
        );
        debug!(number = pr.number, url = %pr.url, "Found pull request");
        result.push(pr);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::tests::ScriptedExecutor;
    use serde_json::json;

    fn pr_item(number: u64, status: Option<&str>) -> Value {
        json!({
            "fieldValueByName": status.map(|s| json!({"name": s})),
            "content": {
                "url": format!("https://github.com/quarkusio/quarkus/pull/{}", number),
                "title": format!("Fix #{}", number),
                "number": number,
                "bodyText": "Backport please"
            }
        })
    }

    fn issue_item(status: &str) -> Value {
        json!({"fieldValueByName": {"name": status}, "content": {}})
    }

    fn page(nodes: Value, end_cursor: Option<&str>, has_next_page: bool) -> Value {
        json!({
            "data": {"organization": {"projectV2": {"items": {
                "nodes": nodes,
                "pageInfo": {"endCursor": end_cursor, "hasNextPage": has_next_page}
            }}}}
        })
    }

    #[tokio::test]
    async fn test_keeps_prs_for_version_across_pages() {
        let executor = ScriptedExecutor::new(vec![
            page(
                json!([
                    pr_item(1, Some("3.20.4")),
                    issue_item("3.20.4"),
                    pr_item(2, Some("3.20.3"))
                ]),
                Some("c1"),
                true,
            ),
            page(json!([null, pr_item(3, Some("3.20.4")), pr_item(4, None)]), None, false),
        ]);

        let prs = list_pull_requests_for_fix_version(
            &executor,
            "quarkusio",
            31,
            &FixVersion::new("3.20.4"),
        )
        .await
        .unwrap();

        let numbers: Vec<u64> = prs.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(prs[0].url, "https://github.com/quarkusio/quarkus/pull/1");
        assert_eq!(prs[0].title, "Fix #1");
        assert_eq!(prs[0].description, "Backport please");
        assert!(prs.iter().all(|p| p.linked_tickets.is_empty()));

        let seen = executor.seen.lock().unwrap();
        assert!(seen[1].document.contains(r#"after: "c1""#));
    }

    #[tokio::test]
    async fn test_status_match_is_exact() {
        let executor = ScriptedExecutor::new(vec![page(
            json!([
                pr_item(1, Some("3.20.4.GA")),
                pr_item(2, Some("3.20")),
                pr_item(3, Some("3.20.4"))
            ]),
            None,
            false,
        )]);

        let prs = list_pull_requests_for_fix_version(
            &executor,
            "quarkusio",
            31,
            &FixVersion::new("3.20.4"),
        )
        .await
        .unwrap();

        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].number, 3);
    }

    #[tokio::test]
    async fn test_duplicate_urls_kept_once() {
        let executor = ScriptedExecutor::new(vec![page(
            json!([pr_item(7, Some("3.20.4")), pr_item(7, Some("3.20.4"))]),
            None,
            false,
        )]);

        let prs = list_pull_requests_for_fix_version(
            &executor,
            "quarkusio",
            31,
            &FixVersion::new("3.20.4"),
        )
        .await
        .unwrap();

        assert_eq!(prs.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_project() {
        let executor = ScriptedExecutor::new(vec![
            json!({"data": {"organization": {"projectV2": null}}}),
        ]);

        let result = list_pull_requests_for_fix_version(
            &executor,
            "quarkusio",
            99,
            &FixVersion::new("3.20.4"),
        )
        .await;

        assert!(matches!(result, Err(Error::ProjectNotFound { number: 99, .. })));
    }

    #[tokio::test]
    async fn test_query_error_fails() {
        let executor = ScriptedExecutor::new(vec![
            page(json!([pr_item(1, Some("3.20.4"))]), Some("c1"), true),
            json!({"errors": [{"message": "Something went wrong"}]}),
        ]);

        let result = list_pull_requests_for_fix_version(
            &executor,
            "quarkusio",
            31,
            &FixVersion::new("3.20.4"),
        )
        .await;

        assert!(matches!(result, Err(Error::QueryExecution(ref m)) if m == "Something went wrong"));
    }
}
