//! Pulls command - list backported pull requests with their tickets

use backport_core::{Config, FixVersion, PullRequestDescriptor};
use backport_github::{list_pull_requests_for_fix_version, GitHubClient};
use backport_jira::{IssueCorrelator, JiraClient};
use clap::Args;

/// Arguments for the pulls command
#[derive(Args, Debug)]
pub struct PullsArgs {
    /// Board number
    pub project: u64,

    /// Fix version as shown on the board, e.g. 3.20.4
    pub fix_version: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl PullsArgs {
    /// Execute the pulls command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        config.validate_for_search()?;

        let github = GitHubClient::new(&config.github.organization)?;
        let jira = JiraClient::new(&config.jira, config.timeout)?;
        let fix_version = FixVersion::new(&self.fix_version);

        let pull_requests =
            fetch_backports(config, &github, &jira, self.project, &fix_version).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&pull_requests)?);
            return Ok(());
        }

        if pull_requests.is_empty() {
            println!("No pull requests for {} on project #{}.", fix_version, self.project);
            return Ok(());
        }

        println!(
            "Pull requests for {} on project #{} ({} found)",
            fix_version,
            self.project,
            pull_requests.len()
        );
        println!();

        for pr in &pull_requests {
            println!("#{}: {}", pr.number, pr.title);
            println!("    {}", pr.url);
            if pr.linked_tickets.is_empty() {
                println!("    no ticket yet");
            }
            for ticket in &pr.linked_tickets {
                println!("    ticket {} ({})", ticket.key, ticket.url);
            }
        }

        Ok(())
    }
}

/// Pull requests of a board for a fix version, linked to their existing tickets
pub async fn fetch_backports(
    config: &Config,
    github: &GitHubClient,
    jira: &JiraClient,
    project: u64,
    fix_version: &FixVersion,
) -> anyhow::Result<Vec<PullRequestDescriptor>> {
    let pull_requests =
        list_pull_requests_for_fix_version(github, github.organization(), project, fix_version)
            .await?;

    let correlator = IssueCorrelator::new(jira, &config.jira);
    Ok(correlator
        .correlate(pull_requests, &fix_version.major_minor_wildcard())
        .await?)
}
