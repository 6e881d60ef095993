//! Configuration management for the backport importer
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (BACKPORT_*)
//! 3. Config file (~/.config/backport/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// GitHub-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Organization owning the backport boards
    pub organization: String,

    /// Regex a board title must match as a whole to count as a backport board
    pub project_pattern: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            organization: "quarkusio".to_string(),
            project_pattern: "Backports.+".to_string(),
        }
    }
}

/// Numeric Jira issue type ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IssueTypeIds {
    pub bug: u64,
    pub upgrade: u64,
    pub feature: u64,
}

/// Jira-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Base URL of the Jira server
    pub server: String,

    /// Project key tickets are created in
    pub project: String,

    /// Id of the custom field holding the pull request URL, e.g. customfield_12310220
    pub pull_request_field_id: String,

    /// Display name of that field, as used in JQL
    pub pull_request_field_name: String,

    /// Issue type ids per importable type
    pub issue_types: IssueTypeIds,

    /// User new tickets are assigned to
    pub assignee: String,

    /// Transition applied after creation, 0 disables it
    pub transition_to_state: u64,

    /// Component set on every created ticket
    pub component: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            server: "https://issues.redhat.com".to_string(),
            project: "QUARKUS".to_string(),
            pull_request_field_id: String::new(),
            pull_request_field_name: "Git Pull Request".to_string(),
            issue_types: IssueTypeIds::default(),
            assignee: String::new(),
            transition_to_state: 0,
            component: "team/eng".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration
    pub github: GitHubConfig,

    /// Jira configuration
    pub jira: JiraConfig,

    /// Mark every created ticket as a test ticket
    pub testing_run: bool,

    /// Timeout applied to every Jira call
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            jira: JiraConfig::default(),
            testing_run: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/backport/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("backport").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - BACKPORT_ORGANIZATION: GitHub organization
    /// - BACKPORT_JIRA_SERVER: Jira base URL
    /// - BACKPORT_JIRA_PROJECT: Jira project key
    /// - BACKPORT_TESTING_RUN: `true`/`false`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(organization) = lookup("BACKPORT_ORGANIZATION") {
            self.github.organization = organization;
        }

        if let Some(server) = lookup("BACKPORT_JIRA_SERVER") {
            self.jira.server = server;
        }

        if let Some(project) = lookup("BACKPORT_JIRA_PROJECT") {
            self.jira.project = project;
        }

        if let Some(testing_run) = lookup("BACKPORT_TESTING_RUN") {
            self.testing_run = testing_run.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "BACKPORT_TESTING_RUN must be true or false, got '{}'",
                    testing_run
                ))
            })?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        organization: Option<String>,
        testing_run: Option<bool>,
    ) -> Self {
        if let Some(org) = organization {
            self.github.organization = org;
        }

        if let Some(testing) = testing_run {
            self.testing_run = testing;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        organization: Option<String>,
        testing_run: Option<bool>,
    ) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(organization, testing_run))
    }

    /// Check the settings the ticket search cannot work without
    pub fn validate_for_search(&self) -> Result<()> {
        if self.jira.pull_request_field_id.trim().is_empty() {
            return Err(Error::Config(
                "jira.pull_request_field_id is not set".to_string(),
            ));
        }
        if self.jira.pull_request_field_name.trim().is_empty() {
            return Err(Error::Config(
                "jira.pull_request_field_name is not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the settings ticket creation cannot work without
    pub fn validate_for_import(&self) -> Result<()> {
        self.validate_for_search()?;

        if self.jira.assignee.trim().is_empty() {
            return Err(Error::Config("jira.assignee is not set".to_string()));
        }

        let ids = &self.jira.issue_types;
        for (name, id) in [("bug", ids.bug), ("upgrade", ids.upgrade), ("feature", ids.feature)] {
            if id == 0 {
                return Err(Error::Config(format!(
                    "jira.issue_types.{} is not set",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.project_pattern, "Backports.+");
        assert_eq!(config.jira.pull_request_field_name, "Git Pull Request");
        assert_eq!(config.jira.component, "team/eng");
        assert_eq!(config.jira.transition_to_state, 0);
        assert!(config.testing_run);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(Some("acme".to_string()), Some(false));

        assert_eq!(config.github.organization, "acme");
        assert!(!config.testing_run);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BACKPORT_ORGANIZATION", "acme"),
            ("BACKPORT_JIRA_PROJECT", "ACME"),
            ("BACKPORT_TESTING_RUN", "false"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides_from(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.github.organization, "acme");
        assert_eq!(config.jira.project, "ACME");
        assert_eq!(config.jira.server, "https://issues.redhat.com");
        assert!(!config.testing_run);
    }

    #[test]
    fn test_env_override_rejects_bad_bool() {
        let result = Config::default().with_overrides_from(|name| {
            (name == "BACKPORT_TESTING_RUN").then(|| "maybe".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
testing_run = false
timeout = "45s"

[github]
organization = "quarkusio"

[jira]
server = "https://issues.example"
project = "QUARKUS"
pull_request_field_id = "customfield_12310220"
assignee = "jdoe"
transition_to_state = 41

[jira.issue_types]
bug = 1
upgrade = 12
feature = 13
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.testing_run);
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.jira.server, "https://issues.example");
        assert_eq!(config.jira.transition_to_state, 41);
        assert_eq!(
            config.jira.issue_types,
            IssueTypeIds {
                bug: 1,
                upgrade: 12,
                feature: 13
            }
        );
        // untouched keys keep their defaults
        assert_eq!(config.github.project_pattern, "Backports.+");
        assert_eq!(config.jira.component, "team/eng");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\norganization = \"acme\"").unwrap();

        let config = Config::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.github.organization, "acme");
    }

    #[test]
    fn test_validate_for_search() {
        let mut config = Config::default();
        assert!(config
            .validate_for_search()
            .unwrap_err()
            .to_string()
            .contains("pull_request_field_id"));

        config.jira.pull_request_field_id = "customfield_1".to_string();
        assert!(config.validate_for_search().is_ok());
    }

    fn importable() -> Config {
        let mut config = Config::default();
        config.jira.pull_request_field_id = "customfield_1".to_string();
        config.jira.assignee = "jdoe".to_string();
        config.jira.issue_types = IssueTypeIds {
            bug: 1,
            upgrade: 12,
            feature: 13,
        };
        config
    }

    #[test]
    fn test_validate_for_import() {
        assert!(Config::default().validate_for_import().is_err());
        assert!(importable().validate_for_import().is_ok());

        let mut config = importable();
        config.jira.assignee = String::new();
        assert!(config.validate_for_import().is_err());
    }

    #[test]
    fn test_validate_for_import_rejects_unset_issue_types() {
        let mut config = importable();
        config.jira.issue_types.upgrade = 0;

        let err = config.validate_for_import().unwrap_err();
        assert!(err.to_string().contains("jira.issue_types.upgrade"));
    }
}
