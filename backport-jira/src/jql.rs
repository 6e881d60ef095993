//! JQL for finding tickets that reference pull requests
//!
//! The pull request link field only supports the `~` operator, so "any of
//! these URLs" is spelled out as an `or` of one clause per URL:
//!
//! ```text
//! project = QUARKUS and fixVersion ~ "3.20.*"
//!     and ("Git Pull Request" ~ "url1" or "Git Pull Request" ~ "url2")
//! ```

/// `("<field>" ~ "<url>" or ...)`, or `None` when there is no URL
pub fn ticket_search_clause<'a, I>(field_name: &str, pr_urls: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let field = quote(field_name);
    let clauses: Vec<String> = pr_urls
        .into_iter()
        .map(|url| format!("{} ~ {}", field, quote(url)))
        .collect();

    if clauses.is_empty() {
        return None;
    }
    Some(format!("({})", clauses.join(" or ")))
}

/// Full search restricted to a project and a fix-version wildcard
pub fn ticket_search_query(
    project_key: &str,
    fix_version_wildcard: &str,
    pr_urls_clause: &str,
) -> String {
    format!(
        "project = {} and fixVersion ~ {} and {}",
        project_key,
        quote(fix_version_wildcard),
        pr_urls_clause
    )
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
