//! Released fix versions of the Jira project

use std::cmp::Reverse;

use regex::Regex;
use tracing::debug;

use crate::{Error, Result, TrackerVersions};

/// Names like `3.20.4.GA`, newest first
pub async fn list_fix_versions<V>(tracker: &V, project_key: &str) -> Result<Vec<String>>
where
    V: TrackerVersions + ?Sized,
{
    let pattern =
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)\.GA$").map_err(|e| Error::Parse(e.to_string()))?;

    let mut versions: Vec<((u64, u64, u64), String)> = tracker
        .project_versions(project_key)
        .await?
        .into_iter()
        .filter_map(|name| {
            let key = {
                let caps = pattern.captures(&name)?;
                let number = |i: usize| caps[i].parse::<u64>().ok();
                (number(1)?, number(2)?, number(3)?)
            };
            Some((key, name))
        })
        .collect();

    versions.sort_by_key(|(key, _)| Reverse(*key));
    debug!(project_key, count = versions.len(), "Found fix versions");

    Ok(versions.into_iter().map(|(_, name)| name).collect())
}
