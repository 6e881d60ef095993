//! Import command - create a Jira ticket for a backported pull request

use backport_core::{Config, FixVersion, PullRequestCache};
use backport_github::GitHubClient;
use backport_jira::{IssueCreator, IssueType, JiraClient};
use clap::Args;

use super::pulls::fetch_backports;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Board number
    pub project: u64,

    /// Fix version as shown on the board, e.g. 3.20.4
    pub fix_version: String,

    /// Number of the pull request to import
    pub pr_number: u64,

    /// Ticket type: bug, upgrade or feature
    #[arg(short = 't', long = "type", default_value = "bug")]
    pub issue_type: String,

    /// Jira fix version (defaults to <fix-version>.GA)
    #[arg(long)]
    pub jira_version: Option<String>,

    /// Create the ticket even if one already references the pull request
    #[arg(long)]
    pub force: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        config.validate_for_import()?;
        // fail on a bad type before anything is fetched
        self.issue_type.parse::<IssueType>()?;

        let github = GitHubClient::new(&config.github.organization)?;
        let jira = JiraClient::new(&config.jira, config.timeout)?;
        let fix_version = FixVersion::new(&self.fix_version);
        let jira_version = self
            .jira_version
            .clone()
            .unwrap_or_else(|| fix_version.exact());

        let cache = PullRequestCache::new();
        cache.extend(fetch_backports(config, &github, &jira, self.project, &fix_version).await?);
        let pr = cache.get(self.pr_number)?;

        if !pr.linked_tickets.is_empty() {
            let keys: Vec<&str> = pr.linked_tickets.iter().map(|t| t.key.as_str()).collect();
            if !self.force {
                anyhow::bail!(
                    "Pull request #{} already has ticket(s) {}; use --force to create another",
                    pr.number,
                    keys.join(", ")
                );
            }
            tracing::warn!(pr = pr.number, tickets = ?keys, "Creating another ticket");
        }

        if config.testing_run {
            println!("Testing run: the ticket will be marked as a test ticket.");
        }

        let creator = IssueCreator::new(&jira, &config.jira, config.testing_run);
        let url = creator
            .create_ticket(&pr.url, &pr.title, &jira_version, &self.issue_type, &pr.description)
            .await?;

        println!("Created {}", url);
        Ok(())
    }
}
