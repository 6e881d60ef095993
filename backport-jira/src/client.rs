//! Jira REST API client using reqwest

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use backport_core::{JiraConfig, Secrets};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::{
    CreateIssueRequest, Error, Result, TrackerIssue, TrackerSearch, TrackerVersions, TrackerWriter,
};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<TrackerIssue>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

#[derive(Debug, Deserialize)]
struct ProjectVersion {
    name: String,
}

/// Error body returned by Jira on 4xx
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ErrorBody {
    error_messages: Vec<String>,
    errors: BTreeMap<String, String>,
}

impl ErrorBody {
    fn messages(self) -> Vec<String> {
        self.error_messages
            .into_iter()
            .chain(
                self.errors
                    .into_iter()
                    .map(|(field, msg)| format!("{}: {}", field, msg)),
            )
            .collect()
    }
}

/// Jira REST API client
pub struct JiraClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
    pull_request_field_id: String,
}

impl JiraClient {
    /// Create a new Jira client for the configured server
    ///
    /// Token is loaded from (in priority order):
    /// 1. JIRA_TOKEN environment variable
    /// 2. ~/.config/backport/secrets.toml
    pub fn new(config: &JiraConfig, timeout: Duration) -> Result<Self> {
        let secrets = Secrets::load().map_err(|e| Error::Auth(e.to_string()))?;

        let token = secrets.jira_token().ok_or_else(|| {
            Error::Auth(
                "Jira token not found. Set JIRA_TOKEN environment variable \
                 or add token to ~/.config/backport/secrets.toml"
                    .to_string(),
            )
        })?;

        Self::with_token(config, &token, timeout)
    }

    /// Create a client with an explicit token
    pub fn with_token(config: &JiraConfig, token: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(&config.server)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::Auth(format!("Invalid Jira token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("backport-importer")
            .timeout(timeout)
            .build()?;

        info!(server = %base, "Created Jira client");

        Ok(Self {
            http,
            base,
            timeout,
            pull_request_field_id: config.pull_request_field_id.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Map transport errors, turning timeouts into [`Error::Timeout`]
    fn transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Http(err)
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Auth("Jira rejected the token".to_string()));
        }

        let messages = serde_json::from_str::<ErrorBody>(&text)
            .map(ErrorBody::messages)
            .unwrap_or_default();
        let detail = if messages.is_empty() {
            text
        } else {
            messages.join(", ")
        };

        Err(Error::QueryExecution(format!("{}: {}", status, detail)))
    }

    async fn parse<T: for<'de> Deserialize<'de>>(&self, response: Response) -> Result<T> {
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.timeout)
            } else {
                Error::Parse(e.to_string())
            }
        })
    }

    /// `POST /rest/api/2/search`; the JQL grows with every pull request URL
    /// and would overflow the request line of a GET
    fn search_request(
        &self,
        jql: &str,
        page_size: usize,
        offset: usize,
    ) -> Result<reqwest::Request> {
        let body = json!({
            "jql": jql,
            "startAt": offset,
            "maxResults": page_size,
            "fields": [self.pull_request_field_id],
        });

        Ok(self
            .http
            .post(self.endpoint("rest/api/2/search")?)
            .json(&body)
            .build()?)
    }
}

#[async_trait]
impl TrackerSearch for JiraClient {
    async fn search(
        &self,
        jql: &str,
        page_size: usize,
        offset: usize,
    ) -> Result<Vec<TrackerIssue>> {
        debug!(jql, page_size, offset, "Searching Jira");

        let request = self.search_request(jql, page_size, offset)?;
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| self.transport(e))?;

        let page: SearchResponse = self.parse(self.check(response).await?).await?;
        Ok(page.issues)
    }
}

#[async_trait]
impl TrackerWriter for JiraClient {
    async fn create_issue(&self, request: &CreateIssueRequest) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint("rest/api/2/issue")?)
            .json(&request.to_payload())
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let created: CreatedIssue = self.parse(self.check(response).await?).await?;
        Ok(created.key)
    }

    async fn transition(&self, key: &str, transition_id: u64) -> Result<()> {
        debug!(key, transition_id, "Transitioning ticket");

        let response = self
            .http
            .post(self.endpoint(&format!("rest/api/2/issue/{}/transitions", key))?)
            .json(&json!({ "transition": { "id": transition_id.to_string() } }))
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        self.check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TrackerVersions for JiraClient {
    async fn project_versions(&self, project_key: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.endpoint(&format!("rest/api/2/project/{}/versions", project_key))?)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let versions: Vec<ProjectVersion> = self.parse(self.check(response).await?).await?;
        Ok(versions.into_iter().map(|v| v.name).collect())
    }
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base", &self.base.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jql;
    use tokio::net::TcpListener;

    fn config(server: &str) -> JiraConfig {
        JiraConfig {
            server: server.to_string(),
            pull_request_field_id: "customfield_1".to_string(),
            ..Default::default()
        }
    }

    fn client(server: &str) -> JiraClient {
        JiraClient::with_token(&config(server), "t", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_on_root_server() {
        let client = client("https://issues.example");
        assert_eq!(
            client.endpoint("rest/api/2/search").unwrap().as_str(),
            "https://issues.example/rest/api/2/search"
        );
    }

    #[test]
    fn test_endpoint_keeps_context_path() {
        let client = client("https://example.com/jira");
        assert_eq!(
            client.endpoint("rest/api/2/issue").unwrap().as_str(),
            "https://example.com/jira/rest/api/2/issue"
        );
    }

    #[test]
    fn test_invalid_server() {
        let result = JiraClient::with_token(&config("not a url"), "t", Duration::from_secs(5));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = JiraClient::with_token(
            &config("https://issues.example"),
            "secret-token",
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!format!("{:?}", client).contains("secret-token"));
    }

    #[test]
    fn test_large_search_goes_in_the_body() {
        let urls: Vec<String> = (0..100)
            .map(|n| format!("https://github.com/quarkusio/quarkus/pull/{}", 40000 + n))
            .collect();
        let clause =
            jql::ticket_search_clause("Git Pull Request", urls.iter().map(String::as_str))
                .unwrap();
        let query = jql::ticket_search_query("QUARKUS", "3.20.*", &clause);

        let client = client("https://issues.example");
        let request = client.search_request(&query, 50, 100).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://issues.example/rest/api/2/search");
        assert!(request.url().query().is_none());

        let body: serde_json::Value = serde_json::from_slice(
            request.body().and_then(|b| b.as_bytes()).unwrap(),
        )
        .unwrap();
        assert_eq!(body["jql"], query.as_str());
        assert_eq!(body["startAt"], 100);
        assert_eq!(body["maxResults"], 50);
        assert_eq!(body["fields"], json!(["customfield_1"]));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            // accept and hold the connection without ever answering
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = JiraClient::with_token(
            &config(&format!("http://{}", addr)),
            "t",
            Duration::from_millis(200),
        )
        .unwrap();

        let result = client.search("project = QUARKUS", 50, 0).await;

        assert!(matches!(result, Err(Error::Timeout(d)) if d == Duration::from_millis(200)));
        server.abort();
    }

    #[test]
    fn test_error_body_messages() {
        let body: ErrorBody = serde_json::from_str(
            r#"{
                "errorMessages": ["The value '3.99.*' does not exist"],
                "errors": {"assignee": "User 'x' does not exist."}
            }"#,
        )
        .unwrap();
        assert_eq!(
            body.messages(),
            vec![
                "The value '3.99.*' does not exist".to_string(),
                "assignee: User 'x' does not exist.".to_string()
            ]
        );
    }
}
