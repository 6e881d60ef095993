//! Projects command - list backport boards

use backport_core::Config;
use backport_github::{list_backport_projects, GitHubClient};
use backport_jira::{list_fix_versions, JiraClient};
use clap::Args;

/// Arguments for the projects command
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Board title pattern (overrides config)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Skip listing Jira fix versions
    #[arg(long)]
    pub no_jira: bool,
}

impl ProjectsArgs {
    /// Execute the projects command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let github = GitHubClient::new(&config.github.organization)?;
        let pattern = self
            .pattern
            .as_deref()
            .unwrap_or(&config.github.project_pattern);

        let listing = list_backport_projects(&github, github.organization(), pattern).await?;

        if listing.projects.is_empty() {
            println!("No backport projects found.");
        } else {
            println!(
                "Backport projects in {} ({} found)",
                github.organization(),
                listing.projects.len()
            );
            println!();
            for project in &listing.projects {
                println!("#{}: {}", project.number, project.title);
                if !project.versions.is_empty() {
                    println!("    versions: {}", project.versions.join(", "));
                }
            }
        }

        if listing.inaccessible > 0 {
            println!();
            println!(
                "{} project(s) could not be read with the current token.",
                listing.inaccessible
            );
        }

        if self.no_jira {
            return Ok(());
        }

        let jira = JiraClient::new(&config.jira, config.timeout)?;
        let versions = list_fix_versions(&jira, &config.jira.project).await?;

        println!();
        println!("Jira fix versions in {}:", config.jira.project);
        for version in versions {
            println!("  {}", version);
        }

        Ok(())
    }
}
