//! Backport CLI - import GitHub backport pull requests into Jira
//!
//! Lists backport boards, shows which queued pull requests already have a
//! Jira ticket, and creates tickets for the ones that don't.

mod commands;

use backport_core::{Config, Secrets};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ImportArgs, ProjectsArgs, PullsArgs};

/// Import GitHub backport pull requests into Jira
#[derive(Parser, Debug)]
#[command(name = "backport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitHub organization (overrides config and env)
    #[arg(long, global = true, env = "BACKPORT_ORGANIZATION")]
    organization: Option<String>,

    /// Mark created tickets as test tickets (overrides config and env)
    #[arg(long, global = true)]
    testing_run: Option<bool>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// List backport boards and Jira fix versions
    #[command(visible_alias = "p")]
    Projects(ProjectsArgs),

    /// List pull requests of a board for a fix version, with existing tickets
    Pulls(PullsArgs),

    /// Create a Jira ticket for one backported pull request
    Import(ImportArgs),

    /// Show current configuration
    Config,

    /// Create a secrets file template
    InitSecrets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::load_with_overrides(cli.organization.clone(), cli.testing_run)?;

    if cli.verbose {
        tracing::info!(
            organization = %config.github.organization,
            jira = %config.jira.server,
            testing_run = config.testing_run,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("backport {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Projects(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Pulls(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Import(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("Backport Configuration");
            println!("======================");
            println!();
            println!("GitHub Settings:");
            println!("  organization: {}", config.github.organization);
            println!("  project_pattern: {}", config.github.project_pattern);
            println!();
            println!("Jira Settings:");
            println!("  server: {}", config.jira.server);
            println!("  project: {}", config.jira.project);
            println!(
                "  pull_request_field: {} ({})",
                config.jira.pull_request_field_name, config.jira.pull_request_field_id
            );
            let types = &config.jira.issue_types;
            println!(
                "  issue_types: bug={} upgrade={} feature={}",
                types.bug, types.upgrade, types.feature
            );
            println!("  assignee: {}", config.jira.assignee);
            println!("  component: {}", config.jira.component);
            println!("  transition_to_state: {}", config.jira.transition_to_state);
            println!();
            println!("testing_run: {}", config.testing_run);
            println!("timeout: {:?}", config.timeout);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        Some(Commands::InitSecrets) => {
            let path = Secrets::create_template()?;
            println!("Created {}", path.display());
            println!("Add your GitHub and Jira tokens, then keep the file private (chmod 600).");
        }
        None => {
            println!("backport - import GitHub backport pull requests into Jira");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
