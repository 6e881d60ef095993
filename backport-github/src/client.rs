//! GitHub API client using octocrab

use crate::{Error, GraphQlExecutor, GraphQlQuery, GraphQlResponse, Result};
use async_trait::async_trait;
use backport_core::Secrets;
use octocrab::Octocrab;
use tracing::{debug, info};

/// GitHub API client bound to one organization
pub struct GitHubClient {
    client: Octocrab,
    organization: String,
}

impl GitHubClient {
    /// Create a new GitHub client for the specified organization
    ///
    /// Token is loaded from (in priority order):
    /// 1. GITHUB_TOKEN environment variable
    /// 2. ~/.config/backport/secrets.toml
    pub fn new(organization: impl Into<String>) -> Result<Self> {
        let secrets = Secrets::load().map_err(|e| Error::Auth(e.to_string()))?;

        let token = secrets.github_token().ok_or_else(|| {
            Error::Auth(
                "GitHub token not found. Set GITHUB_TOKEN environment variable \
                 or add token to ~/.config/backport/secrets.toml"
                    .to_string(),
            )
        })?;

        Self::with_token(organization, token)
    }

    /// Create a client with an explicit token
    pub fn with_token(organization: impl Into<String>, token: String) -> Result<Self> {
        let organization = organization.into();

        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        info!(organization = %organization, "Created GitHub client");

        Ok(Self {
            client,
            organization,
        })
    }

    /// Get the organization the client works on
    pub fn organization(&self) -> &str {
        &self.organization
    }
}

#[async_trait]
impl GraphQlExecutor for GitHubClient {
    async fn execute(&self, query: &GraphQlQuery) -> Result<GraphQlResponse> {
        debug!(variables = %query.variables, "Executing GraphQL query");

        self.client.graphql(query).await.map_err(Error::Api)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_token_keeps_organization() {
        let client = GitHubClient::with_token("quarkusio", "ghp_test".to_string()).unwrap();
        assert_eq!(client.organization(), "quarkusio");
        assert!(format!("{:?}", client).contains("quarkusio"));
        assert!(!format!("{:?}", client).contains("ghp_test"));
    }
}
