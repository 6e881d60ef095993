//! Offset pagination over JQL search results

use tracing::debug;

use crate::{Result, TrackerIssue, TrackerSearch};

/// Issues requested per search page
pub const SEARCH_PAGE_SIZE: usize = 50;

/// Fetch every issue matching `jql`
///
/// Page `p` is requested at offset `p * page_size`; a page with fewer than
/// `page_size` issues is the last one. Any failure aborts the walk without
/// returning the pages fetched so far.
pub async fn fetch_all_by_offset<S>(
    search: &S,
    jql: &str,
    page_size: usize,
) -> Result<Vec<TrackerIssue>>
where
    S: TrackerSearch + ?Sized,
{
    let page_size = page_size.max(1);
    let mut issues = Vec::new();
    let mut page = 0usize;

    loop {
        let batch = search.search(jql, page_size, page * page_size).await?;
        let count = batch.len();
        debug!(page, count, "Fetched search page");

        issues.extend(batch);
        page += 1;

        if count < page_size {
            break;
        }
    }

    Ok(issues)
}
