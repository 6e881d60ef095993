//! Secrets management for the backport importer
//!
//! Tokens are stored separately from configuration to avoid accidental sharing.
//! The secrets file is located at `~/.config/backport/secrets.toml` and must have
//! restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (GITHUB_TOKEN, JIRA_TOKEN)
//! 2. Secrets file (~/.config/backport/secrets.toml)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub token
    pub github: TokenSecret,

    /// Jira personal access token
    pub jira: TokenSecret,
}

/// A single API token
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenSecret {
    pub token: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(
                path = %path.display(),
                mode = format!("{:o}", mode & 0o777),
                "Secrets file permissions OK"
            );
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        for token in [&mut secrets.github.token, &mut secrets.jira.token]
            .into_iter()
            .flatten()
        {
            *token = token.trim().to_string();
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/backport/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("backport").join("secrets.toml"))
    }

    /// Get GitHub token, GITHUB_TOKEN env var first
    pub fn github_token(&self) -> Option<String> {
        resolve_token("GITHUB_TOKEN", std::env::var("GITHUB_TOKEN").ok(), &self.github)
    }

    /// Get Jira token, JIRA_TOKEN env var first
    pub fn jira_token(&self) -> Option<String> {
        resolve_token("JIRA_TOKEN", std::env::var("JIRA_TOKEN").ok(), &self.jira)
    }

    /// Create a template secrets file at the default location
    ///
    /// Creates parent directories if needed and sets secure permissions
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        // Don't overwrite existing file
        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        let template = r#"# Backport importer secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)

[github]
# GitHub token, needs the read:project scope and membership in the organization
token = ""

[jira]
# Jira personal access token
token = ""
"#;

        std::fs::write(&path, template).map_err(Error::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, perms).map_err(Error::Io)?;
        }

        warn!(path = %path.display(), "Created secrets template - please edit and add your tokens");

        Ok(path)
    }
}

fn resolve_token(var: &str, from_env: Option<String>, file: &TokenSecret) -> Option<String> {
    if let Some(token) = from_env {
        let token = token.trim().to_string();
        if !token.is_empty() {
            debug!(var, "Using token from environment variable");
            return Some(token);
        }
    }

    if let Some(ref token) = file.token {
        if !token.is_empty() {
            debug!(var, "Using token from secrets file");
            return Some(token.clone());
        }
    }

    None
}
