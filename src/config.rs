//! Run configuration loaded once and passed into every component.
//!
//! Values come from a key lookup, normally the process environment.
//! Blank values count as unset. Credentials are only required by the
//! operations that use them, so loading never fails for a missing token.

use crate::mirror::{
    adapters::{
        github::{self, GitHubSettings},
        linear::{self, LinearSettings},
        notion::{self, NotionSettings},
    },
    domain::{RepositoryFullName, TeamId},
};
use crate::workload::domain::{Capacity, Roster};
use camino::Utf8PathBuf;
use chrono::Duration;
use thiserror::Error;

/// Task store API key.
pub const NOTION_API_KEY: &str = "NOTION_API_KEY";
/// Task store base URL.
pub const NOTION_API_URL: &str = "NOTION_API_URL";
/// Task store API version.
pub const NOTION_VERSION: &str = "NOTION_VERSION";
/// Tasks database identifier.
pub const NOTION_TASKS_DATABASE_ID: &str = "NOTION_TASKS_DATABASE_ID";
/// Issue tracker API key.
pub const LINEAR_API_KEY: &str = "LINEAR_API_KEY";
/// Issue tracker endpoint.
pub const LINEAR_API_URL: &str = "LINEAR_API_URL";
/// Preferred issue tracker team.
pub const LINEAR_TEAM_ID: &str = "LINEAR_TEAM_ID";
/// Pull request source token.
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Pull request source base URL.
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";
/// Repository owner.
pub const GITHUB_OWNER: &str = "GITHUB_OWNER";
/// Repository name.
pub const GITHUB_REPO: &str = "GITHUB_REPO";
/// Comma-separated agent roster.
pub const SYNC_AGENTS: &str = "SYNC_AGENTS";
/// Per-agent open-item cap.
pub const MAX_TASKS_PER_AGENT: &str = "MAX_TASKS_PER_AGENT";
/// Look-back window for closed pull requests, in days.
pub const PR_RECENT_DAYS: &str = "PR_RECENT_DAYS";
/// Directory run logs are written to.
pub const SYNC_LOG_DIR: &str = "SYNC_LOG_DIR";

const DEFAULT_LOG_DIR: &str = "logs";

/// Errors raised while loading or using configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A credential the operation needs is not set.
    #[error("{0} environment variable is required")]
    MissingCredential(&'static str),

    /// A value is set but unusable.
    #[error("invalid {key}: {message}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything a run needs to know about the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    notion_token: Option<String>,
    notion_api_url: String,
    notion_version: String,
    notion_database_id: String,
    linear_token: Option<String>,
    linear_api_url: String,
    linear_team: Option<TeamId>,
    github_token: Option<String>,
    github_api_url: String,
    github_owner: Option<String>,
    github_repo: Option<String>,
    roster: Roster,
    capacity: Capacity,
    recent_days: i64,
    log_dir: Utf8PathBuf,
}

fn read(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn invalid(key: &'static str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: err.to_string(),
    }
}

impl SyncConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set value cannot be parsed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let linear_team = read(&lookup, LINEAR_TEAM_ID)
            .map(TeamId::new)
            .transpose()
            .map_err(|err| invalid(LINEAR_TEAM_ID, err))?;
        let roster = match read(&lookup, SYNC_AGENTS) {
            Some(list) => Roster::parse(&list).map_err(|err| invalid(SYNC_AGENTS, err))?,
            None => Roster::default(),
        };
        let capacity = match read(&lookup, MAX_TASKS_PER_AGENT) {
            Some(value) => Capacity::new(
                value
                    .parse::<u32>()
                    .map_err(|err| invalid(MAX_TASKS_PER_AGENT, err))?,
            ),
            None => Capacity::default(),
        };
        let recent_days = match read(&lookup, PR_RECENT_DAYS) {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|days| (1..=365).contains(days))
                .ok_or_else(|| invalid(PR_RECENT_DAYS, "expected a whole number of days, 1 to 365"))?,
            None => crate::mirror::services::DEFAULT_RECENT_DAYS,
        };

        Ok(Self {
            notion_token: read(&lookup, NOTION_API_KEY),
            notion_api_url: read(&lookup, NOTION_API_URL)
                .unwrap_or_else(|| notion::DEFAULT_BASE_URL.to_owned()),
            notion_version: read(&lookup, NOTION_VERSION)
                .unwrap_or_else(|| notion::DEFAULT_VERSION.to_owned()),
            notion_database_id: read(&lookup, NOTION_TASKS_DATABASE_ID)
                .unwrap_or_else(|| notion::DEFAULT_TASKS_DATABASE_ID.to_owned()),
            linear_token: read(&lookup, LINEAR_API_KEY),
            linear_api_url: read(&lookup, LINEAR_API_URL)
                .unwrap_or_else(|| linear::DEFAULT_API_URL.to_owned()),
            linear_team,
            github_token: read(&lookup, GITHUB_TOKEN),
            github_api_url: read(&lookup, GITHUB_API_URL)
                .unwrap_or_else(|| github::DEFAULT_API_URL.to_owned()),
            github_owner: read(&lookup, GITHUB_OWNER),
            github_repo: read(&lookup, GITHUB_REPO),
            roster,
            capacity,
            recent_days,
            log_dir: read(&lookup, SYNC_LOG_DIR)
                .map_or_else(|| Utf8PathBuf::from(DEFAULT_LOG_DIR), Utf8PathBuf::from),
        })
    }

    /// Replaces the issue tracker key when `token` is set and not blank.
    #[must_use]
    pub fn with_linear_token(mut self, token: Option<String>) -> Self {
        if let Some(value) = token.map(|raw| raw.trim().to_owned())
            && !value.is_empty()
        {
            self.linear_token = Some(value);
        }
        self
    }

    /// Returns task store settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when no key is set.
    pub fn notion(&self) -> ConfigResult<NotionSettings> {
        let token = self
            .notion_token
            .clone()
            .ok_or(ConfigError::MissingCredential(NOTION_API_KEY))?;
        let mut settings = NotionSettings::new(token).with_base_url(self.notion_api_url.as_str());
        settings.version.clone_from(&self.notion_version);
        settings.database_id.clone_from(&self.notion_database_id);
        Ok(settings)
    }

    /// Returns issue tracker settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when no key is set.
    pub fn linear(&self) -> ConfigResult<LinearSettings> {
        let token = self
            .linear_token
            .clone()
            .ok_or(ConfigError::MissingCredential(LINEAR_API_KEY))?;
        Ok(LinearSettings::new(token).with_api_url(self.linear_api_url.as_str()))
    }

    /// Returns pull request source settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when the token is not set,
    /// or [`ConfigError::Invalid`] when the repository is missing or
    /// malformed.
    pub fn github(&self) -> ConfigResult<GitHubSettings> {
        let token = self
            .github_token
            .clone()
            .ok_or(ConfigError::MissingCredential(GITHUB_TOKEN))?;
        let owner = self
            .github_owner
            .as_deref()
            .ok_or_else(|| invalid(GITHUB_OWNER, "not set"))?;
        let repo = self
            .github_repo
            .as_deref()
            .ok_or_else(|| invalid(GITHUB_REPO, "not set"))?;
        let repository =
            RepositoryFullName::from_parts(owner, repo).map_err(|err| invalid(GITHUB_REPO, err))?;
        Ok(GitHubSettings::new(token, repository).with_api_url(self.github_api_url.as_str()))
    }

    /// Returns the preferred issue tracker team.
    #[must_use]
    pub const fn linear_team(&self) -> Option<&TeamId> {
        self.linear_team.as_ref()
    }

    /// Returns the agent roster.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Returns the per-agent cap.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Returns the closed pull request look-back window.
    #[must_use]
    pub fn recent_window(&self) -> Duration {
        Duration::days(self.recent_days)
    }

    /// Returns the run log directory.
    #[must_use]
    pub fn log_dir(&self) -> &camino::Utf8Path {
        &self.log_dir
    }
}
