//! Runtime configuration for reaching the analysis service.
//!
//! Loaded from YAML. Durations are written in human-readable form:
//!
//! ```yaml
//! base_url: "https://analysis.internal:5000"
//! request_timeout: 90s
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "DEALVIEW_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Analysis runs are slow; the service may take minutes per deal.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

/// How to reach the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Service root; `/run` is appended
    pub base_url: String,

    /// Whole-request timeout, including reading the body
    #[serde(with = "duration_human")]
    pub request_timeout: Duration,

    pub user_agent: String,
}

mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("dealview/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Apply [`BASE_URL_ENV`] from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are
    /// ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Endpoint that runs an analysis.
    pub fn run_url(&self) -> String {
        format!("{}/run", self.base_url.trim().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.user_agent.starts_with("dealview/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_and_keeps_defaults() {
        let config = RuntimeConfig::from_yaml(
            r#"
base_url: "https://analysis.example.com"
request_timeout: 90s
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://analysis.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.user_agent, RuntimeConfig::default().user_agent);
    }

    #[test]
    fn test_yaml_rejects_unknown_keys() {
        let result = RuntimeConfig::from_yaml("retries: 3\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_yaml_rejects_bad_duration() {
        let result = RuntimeConfig::from_yaml("request_timeout: soon\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_durations_serialize_human_readable() {
        let yaml = serde_yaml::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("request_timeout: 2m"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RuntimeConfig::default().with_base_url("ftp://example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl(url)) if url == "ftp://example.com"
        ));

        let config = RuntimeConfig::from_yaml("request_timeout: 0s\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_env_override() {
        let mut config = RuntimeConfig::default();
        config.apply_env_from(|key| {
            (key == BASE_URL_ENV).then(|| "http://10.0.0.5:8080".to_string())
        });
        assert_eq!(config.base_url, "http://10.0.0.5:8080");

        config.apply_env_from(|_| Some("  ".to_string()));
        assert_eq!(config.base_url, "http://10.0.0.5:8080");
    }

    #[test]
    fn test_run_url_strips_trailing_slash() {
        let config = RuntimeConfig::default().with_base_url("http://localhost:5000/");
        assert_eq!(config.run_url(), "http://localhost:5000/run");
    }

    #[test]
    fn test_missing_file() {
        let result = RuntimeConfig::from_yaml_file("/nonexistent/dealview.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
