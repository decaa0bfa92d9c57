//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable overriding `source.username`.
pub const ENV_USERNAME: &str = "GRADEWATCH_USERNAME";
/// Environment variable overriding `source.password`.
pub const ENV_PASSWORD: &str = "GRADEWATCH_PASSWORD";
/// Environment variable overriding `notifier.webhook_url`.
pub const ENV_WEBHOOK_URL: &str = "GRADEWATCH_WEBHOOK_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream student data settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Change notification settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Snapshot file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Poll loop and term selection
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply credential overrides from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup(ENV_USERNAME) {
            self.source.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.source.password = password;
        }
        if let Some(webhook) = lookup(ENV_WEBHOOK_URL).filter(|v| !v.trim().is_empty()) {
            self.notifier.webhook_url = Some(webhook);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.file.is_none() {
            let endpoint = self.source.endpoint.trim();
            if endpoint.is_empty() {
                return Err(AppError::validation(
                    "source.endpoint is empty and no source.file is set",
                ));
            }
            Url::parse(endpoint)?;
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if let Some(webhook) = &self.notifier.webhook_url {
            Url::parse(webhook)?;
        }
        if self.notifier.timeout_secs == 0 {
            return Err(AppError::validation("notifier.timeout_secs must be > 0"));
        }
        if self.storage.classes_file == self.storage.assignments_file {
            return Err(AppError::validation(
                "storage.classes_file and storage.assignments_file must differ",
            ));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::validation("schedule.interval_secs must be > 0"));
        }
        if self.schedule.term_prefix.is_empty() {
            return Err(AppError::validation("schedule.term_prefix is empty"));
        }
        Ok(())
    }
}

/// Upstream student information system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL returning the student record as JSON
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Basic auth username
    #[serde(default)]
    pub username: String,

    /// Basic auth password
    #[serde(default)]
    pub password: String,

    /// Read the student record from a local JSON file instead of HTTP
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            username: String::new(),
            password: String::new(),
            file: None,
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Notification transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Webhook receiving `{"content": ...}`; changes are only logged when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl NotifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Snapshot file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot files
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,

    #[serde(default = "defaults::classes_file")]
    pub classes_file: String,

    #[serde(default = "defaults::assignments_file")]
    pub assignments_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
            classes_file: defaults::classes_file(),
            assignments_file: defaults::assignments_file(),
        }
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between cycle starts
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Title prefix identifying quarter reporting terms
    #[serde(default = "defaults::term_prefix")]
    pub term_prefix: String,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            term_prefix: defaults::term_prefix(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn endpoint() -> String {
        "https://example.powerschool.com/api/student".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; gradewatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn storage_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn classes_file() -> String {
        "backup_classes.json".into()
    }
    pub fn assignments_file() -> String {
        "backup_assignments.json".into()
    }
    pub fn interval() -> u64 {
        30
    }
    pub fn term_prefix() -> String {
        "Q".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.interval(), Duration::from_secs(30));
        assert_eq!(config.schedule.term_prefix, "Q");
        assert_eq!(config.storage.classes_file, "backup_classes.json");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            endpoint = "https://sis.example.org/student.json"
            username = "parent"

            [schedule]
            interval_secs = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.source.username, "parent");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.schedule.interval_secs, 300);
        assert_eq!(config.schedule.term_prefix, "Q");
        assert!(config.notifier.webhook_url.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.schedule.interval_secs = 0;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_webhook() {
        let mut config = Config::default();
        config.notifier.webhook_url = Some("not a url".into());
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn test_file_source_skips_endpoint_check() {
        let mut config = Config::default();
        config.source.endpoint = String::new();
        assert!(config.validate().is_err());

        config.source.file = Some(PathBuf::from("student.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_USERNAME, "alice"),
            (ENV_PASSWORD, "hunter2"),
            (ENV_WEBHOOK_URL, "https://hooks.example.com/abc"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.source.username, "alice");
        assert_eq!(config.source.password, "hunter2");
        assert_eq!(
            config.notifier.webhook_url.as_deref(),
            Some("https://hooks.example.com/abc")
        );
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/gradewatch.toml");
        assert_eq!(config.schedule.interval_secs, 30);
    }
}
