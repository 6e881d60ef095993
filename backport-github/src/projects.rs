//! Discovery of backport boards

use std::cmp::Reverse;

use backport_core::ProjectDescriptor;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{queries, Error, GraphQlExecutor, Result};

#[derive(Debug, Deserialize)]
struct DiscoveryData {
    organization: Option<OrganizationProjects>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationProjects {
    projects_v2: Option<ProjectConnection>,
}

#[derive(Debug, Deserialize)]
struct ProjectConnection {
    nodes: Option<Vec<Option<ProjectNode>>>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    title: String,
    number: u64,
    field: Option<StatusField>,
}

#[derive(Debug, Deserialize)]
struct StatusField {
    #[serde(default)]
    options: Vec<StatusOption>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct StatusOption {
    id: String,
    name: String,
}

/// Backport boards found in an organization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListing {
    /// Matching boards, highest project number first
    pub projects: Vec<ProjectDescriptor>,
    /// Boards skipped because the token may not read them
    pub inaccessible: usize,
}

/// List the boards whose title matches `name_pattern` as a whole
///
/// Only the first 100 boards of the organization are looked at.
pub async fn list_backport_projects<E>(
    executor: &E,
    organization: &str,
    name_pattern: &str,
) -> Result<ProjectListing>
where
    E: GraphQlExecutor + ?Sized,
{
    let pattern = whole_match(name_pattern)?;
    debug!(organization, pattern = %pattern, "Listing backport projects");

    let data = executor
        .execute(&queries::project_discovery(organization))
        .await?
        .into_data()?;

    let nodes = project_nodes(data)?.ok_or_else(|| Error::NoAccessibleProjects {
        organization: organization.to_string(),
    })?;

    if !nodes.is_empty() && nodes.iter().all(Option::is_none) {
        return Err(Error::NoAccessibleProjects {
            organization: organization.to_string(),
        });
    }

    let listing = catalog(nodes, &pattern);

    if listing.inaccessible > 0 {
        warn!(
            organization,
            count = listing.inaccessible,
            "Some projects were ignored because the token lacks permission to read them"
        );
    }
    info!(count = listing.projects.len(), "Found backport projects");

    Ok(listing)
}

fn whole_match(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})$", pattern))?)
}

/// `None` when the organization or its project list is absent
fn project_nodes(data: Option<Value>) -> Result<Option<Vec<Option<ProjectNode>>>> {
    let Some(data) = data else {
        return Ok(None);
    };
    let data: DiscoveryData = serde_json::from_value(data)
        .map_err(|e| Error::Parse(format!("Failed to parse projects: {}", e)))?;

    Ok(data
        .organization
        .and_then(|org| org.projects_v2)
        .and_then(|projects| projects.nodes))
}

fn catalog(nodes: Vec<Option<ProjectNode>>, pattern: &Regex) -> ProjectListing {
    let mut listing = ProjectListing::default();

    for node in nodes {
        let Some(node) = node else {
            listing.inaccessible += 1;
            continue;
        };
        if !pattern.is_match(&node.title) {
            continue;
        }

        let versions = node
            .field
            .map(|field| field.options.into_iter().map(|o| o.name).collect())
            .unwrap_or_default();
        let project = ProjectDescriptor {
            number: node.number,
            title: node.title,
            versions,
        };
        debug!(number = project.number, title = %project.title, "Found project");
        listing.projects.push(project);
    }

    // stable, so equal numbers keep response order
    listing.projects.sort_by_key(|p| Reverse(p.number));
    listing
}
