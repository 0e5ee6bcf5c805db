//! Application configuration.
//!
//! Configuration is stored as YAML in the platform config directory
//! (or wherever `ISSUE_HELPER_CONFIG` points) and includes:
//! - The GitHub owner and the repositories issues can be filed against
//! - API and web base URLs
//! - Search debounce window and result limit
//! - Localized labels for the preview dialog
//! - An optional GitHub token

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HelperError, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "ISSUE_HELPER_CONFIG";

pub const LABEL_PREVIEW_TITLE: &str = "previewModal.title";
pub const LABEL_CREATE: &str = "issue.create";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub organization or user owning the repositories
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repositories issues may be filed against
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    /// Repository preselected in both forms
    #[serde(default = "default_repository")]
    pub default_repository: String,

    /// Repository whose releases populate the version selector
    #[serde(default = "default_repository")]
    pub release_repository: String,

    /// Repository searched for similar issues
    #[serde(default = "default_repository")]
    pub search_repository: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    #[serde(default)]
    pub search: SearchConfig,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,

    /// Localized UI strings keyed like `previewModal.title`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_owner() -> String {
    "hbyunzai".to_string()
}

fn default_repositories() -> Vec<String> {
    vec!["ng-yunzai".to_string(), "yelon".to_string()]
}

fn default_repository() -> String {
    "ng-yunzai".to_string()
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_base_url() -> String {
    "https://github.com".to_string()
}

fn default_remote_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repositories: default_repositories(),
            default_repository: default_repository(),
            release_repository: default_repository(),
            search_repository: default_repository(),
            api_base_url: default_api_base_url(),
            web_base_url: default_web_base_url(),
            search: SearchConfig::default(),
            remote_timeout: default_remote_timeout(),
            labels: BTreeMap::new(),
            auth: AuthConfig::default(),
        }
    }
}

/// Similar-issue search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a search fires (default: 300)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of results (default: 5)
    #[serde(default = "default_search_limit")]
    pub limit: u8,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_search_limit() -> u8 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            limit: default_search_limit(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubAuth>,
}

/// GitHub authentication
#[derive(Clone, Serialize, Deserialize)]
pub struct GitHubAuth {
    pub token: String,
}

impl fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubAuth")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let dirs = directories::ProjectDirs::from("", "", "issue-helper").ok_or_else(|| {
            HelperError::Config("could not determine a config directory".to_string())
        })?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Reject settings the rest of the tool cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(HelperError::Config("owner cannot be empty".to_string()));
        }
        if self.repositories.is_empty() {
            return Err(HelperError::Config(
                "at least one repository must be configured".to_string(),
            ));
        }
        if !self.repositories.contains(&self.default_repository) {
            return Err(HelperError::Config(format!(
                "default_repository '{}' is not one of: {}",
                self.default_repository,
                self.repositories.join(", ")
            )));
        }
        for (key, value) in [
            ("api_base_url", &self.api_base_url),
            ("web_base_url", &self.web_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| HelperError::Config(format!("invalid {key} '{value}': {e}")))?;
        }
        if self.search.limit == 0 || self.search.limit > 100 {
            return Err(HelperError::Config(
                "search.limit must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// Get GitHub token from environment variable or config
    pub fn github_token(&self) -> Option<String> {
        if let Ok(token) = env::var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            return Some(token);
        }

        self.auth.github.as_ref().map(|g| g.token.clone())
    }

    pub fn set_github_token(&mut self, token: String) {
        self.auth.github = Some(GitHubAuth { token });
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }

    /// Look up a localized label, falling back to English.
    pub fn label(&self, key: &str) -> String {
        if let Some(value) = self.labels.get(key) {
            return value.clone();
        }
        match key {
            LABEL_PREVIEW_TITLE => "Issue Preview".to_string(),
            LABEL_CREATE => "Create".to_string(),
            other => other.to_string(),
        }
    }

    /// Read a value by dotted key.
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "owner" => self.owner.clone(),
            "repositories" => self.repositories.join(","),
            "default_repository" => self.default_repository.clone(),
            "release_repository" => self.release_repository.clone(),
            "search_repository" => self.search_repository.clone(),
            "api_base_url" => self.api_base_url.clone(),
            "web_base_url" => self.web_base_url.clone(),
            "search.debounce_ms" => self.search.debounce_ms.to_string(),
            "search.limit" => self.search.limit.to_string(),
            "remote_timeout" => self.remote_timeout.to_string(),
            "github.token" => match self.github_token() {
                Some(token) => mask_sensitive_value(&token),
                None => "not configured".to_string(),
            },
            _ => match key.strip_prefix("labels.") {
                Some(label) => self.label(label),
                None => return Err(unknown_key(key)),
            },
        };
        Ok(value)
    }

    /// Write a value by dotted key.
    ///
    /// The config is left untouched when the new value does not validate.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        updated.apply_value(key, value)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn apply_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "owner" => self.owner = value.to_string(),
            "repositories" => {
                self.repositories = value
                    .split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect();
            }
            "default_repository" => self.default_repository = value.to_string(),
            "release_repository" => self.release_repository = value.to_string(),
            "search_repository" => self.search_repository = value.to_string(),
            "api_base_url" => self.api_base_url = value.to_string(),
            "web_base_url" => self.web_base_url = value.to_string(),
            "search.debounce_ms" => self.search.debounce_ms = parse_number(key, value)?,
            "search.limit" => self.search.limit = parse_number(key, value)?,
            "remote_timeout" => self.remote_timeout = parse_number(key, value)?,
            "github.token" => self.set_github_token(value.to_string()),
            _ => match key.strip_prefix("labels.") {
                Some(label) if !label.is_empty() => {
                    self.labels.insert(label.to_string(), value.to_string());
                }
                _ => return Err(unknown_key(key)),
            },
        }
        Ok(())
    }
}

pub const VALID_KEYS: &[&str] = &[
    "owner",
    "repositories",
    "default_repository",
    "release_repository",
    "search_repository",
    "api_base_url",
    "web_base_url",
    "search.debounce_ms",
    "search.limit",
    "remote_timeout",
    "github.token",
    "labels.<key>",
];

fn unknown_key(key: &str) -> HelperError {
    HelperError::Config(format!(
        "unknown config key '{key}', expected one of: {}",
        VALID_KEYS.join(", ")
    ))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HelperError::Config(format!("{key} expects a number, got '{value}'")))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.owner, "hbyunzai");
        assert_eq!(config.repositories, vec!["ng-yunzai", "yelon"]);
        assert_eq!(config.debounce_window(), Duration::from_millis(300));
        assert_eq!(config.search.limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml_ng::from_str("owner: someone\n").unwrap();
        assert_eq!(config.owner, "someone");
        assert_eq!(config.default_repository, "ng-yunzai");
        assert_eq!(config.remote_timeout, 30);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.set_github_token("ghp_test123".to_string());
        config
            .set_value("labels.previewModal.title", "Vorschau")
            .unwrap();

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed.auth.github.as_ref().unwrap().token, "ghp_test123");
        assert_eq!(parsed.label(LABEL_PREVIEW_TITLE), "Vorschau");
        assert_eq!(parsed.label(LABEL_CREATE), "Create");
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.set_github_token("ghp_secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_set_value_validates() {
        let mut config = Config::default();
        assert!(config.set_value("search.limit", "0").is_err());
        assert!(config.set_value("search.limit", "abc").is_err());
        assert!(config.set_value("default_repository", "missing").is_err());
        assert!(config.set_value("no.such.key", "x").is_err());

        let mut config = Config::default();
        config.set_value("search.debounce_ms", "150").unwrap();
        assert_eq!(config.get_value("search.debounce_ms").unwrap(), "150");
        config.set_value("repositories", "a, b").unwrap_err();
    }

    #[test]
    fn test_rejected_value_leaves_config_unchanged() {
        let mut config = Config::default();
        config.set_value("search.limit", "0").unwrap_err();
        assert_eq!(config.search.limit, 5);

        config.set_value("default_repository", "missing").unwrap_err();
        assert_eq!(config.default_repository, "ng-yunzai");

        config.set_value("repositories", "a, b").unwrap_err();
        assert!(config.repositories.contains(&"ng-yunzai".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_save_and_load_through_env_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");
        unsafe { env::set_var(CONFIG_PATH_ENV, path.to_str().unwrap()) };

        assert_eq!(Config::config_path().unwrap(), path);
        assert_eq!(Config::load().unwrap().owner, "hbyunzai");

        let mut config = Config::default();
        config.set_value("owner", "someone").unwrap();
        config.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.owner, "someone");

        unsafe { env::remove_var(CONFIG_PATH_ENV) };
    }

    #[test]
    #[serial]
    fn test_env_token_wins() {
        let mut config = Config::default();
        config.set_github_token("from_file".to_string());

        unsafe { env::set_var("GITHUB_TOKEN", "from_env") };
        assert_eq!(config.github_token().as_deref(), Some("from_env"));
        unsafe { env::remove_var("GITHUB_TOKEN") };

        assert_eq!(config.github_token().as_deref(), Some("from_file"));
    }

    #[test]
    fn test_mask_sensitive_value() {
        assert_eq!(mask_sensitive_value("ghp_abcdef"), "gh...ef");
        assert_eq!(mask_sensitive_value("abc"), "****");
    }
}
