//! Cursor pagination over GraphQL connections

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{Error, GraphQlExecutor, GraphQlQuery, Result};

/// `pageInfo` of a GraphQL connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One page of a connection
///
/// Nodes the token may not read come back as `None`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<N>>,
    #[serde(default)]
    pub page_info: PageInfo,
}

/// Follow `endCursor` until `hasNextPage` is false
///
/// `build_query` receives the cursor of the previous page (`None` for the
/// first one), `extract` picks the connection out of a page's payload. Raw
/// nodes, `None` placeholders included, are accumulated in page order. Any
/// failure aborts the walk without returning the pages fetched so far.
pub async fn fetch_all_by_cursor<E, N, Q, X>(
    executor: &E,
    mut build_query: Q,
    mut extract: X,
) -> Result<Vec<Option<N>>>
where
    E: GraphQlExecutor + ?Sized,
    Q: FnMut(Option<&str>) -> GraphQlQuery,
    X: FnMut(Option<Value>) -> Result<Connection<N>>,
{
    let mut nodes = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;

    loop {
        let query = build_query(cursor.as_deref());
        let data = executor.execute(&query).await?.into_data()?;
        let connection = extract(data)?;
        page += 1;

        debug!(
            page,
            count = connection.nodes.len(),
            has_next_page = connection.page_info.has_next_page,
            "Fetched page"
        );

        nodes.extend(connection.nodes);

        if !connection.page_info.has_next_page {
            break;
        }

        match connection.page_info.end_cursor {
            Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
            _ => {
                return Err(Error::QueryExecution(format!(
                    "page {} reports more results but no new endCursor",
                    page
                )))
            }
        }
    }

    Ok(nodes)
}
