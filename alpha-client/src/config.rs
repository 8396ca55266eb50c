//! Client configuration: TOML file, then environment, then command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const ENV_API_URL: &str = "ALPHA_API_URL";
pub const APP_DIR: &str = "alpha-terminal";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid api_url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL.
    pub api_url: String,
    /// Per-request timeout in seconds; `0` waits forever.
    pub request_timeout_secs: u64,
    /// News auto-refresh interval in seconds.
    pub auto_refresh_secs: u64,
    /// Search debounce in milliseconds.
    pub debounce_ms: u64,
    /// Fetch quotes for tickers mentioned in headlines.
    pub stock_enrichment: bool,
    /// Where the terminal UI writes its log.
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            auto_refresh_secs: 300,
            debounce_ms: 250,
            stock_enrichment: true,
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// `<config_dir>/alpha-terminal/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, which must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Explicit path if given, else the default location when it exists, else defaults.
    /// The environment override is applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        if let Ok(url) = std::env::var(ENV_API_URL) {
            config.override_api_url(Some(url));
        }
        Ok(config)
    }

    /// Replace the base URL when `url` is non-blank.
    pub fn override_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: self.api_url.clone(),
                reason: "not a base URL".into(),
            });
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn auto_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_secs.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Log file location: configured path, else `<data_dir>/alpha-terminal/alpha-tui.log`.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("alpha-tui.log")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = ClientConfig::from_toml("").unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.base_url().unwrap().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let cfg = ClientConfig::from_toml("api_url = \"http://dash:9000\"\nrequest_timeout_secs = 0\n").unwrap();
        assert_eq!(cfg.api_url, "http://dash:9000");
        assert_eq!(cfg.request_timeout(), None);
        assert_eq!(cfg.debounce(), Duration::from_millis(250));
        assert_eq!(cfg.auto_refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stock_enrichment = false").unwrap();
        writeln!(file, "debounce_ms = 100").unwrap();
        let cfg = ClientConfig::from_file(file.path()).unwrap();
        assert!(!cfg.stock_enrichment);
        assert_eq!(cfg.debounce(), Duration::from_millis(100));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(ClientConfig::from_toml("api_url = ["), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn url_override_and_validation() {
        let mut cfg = ClientConfig::default();
        cfg.override_api_url(Some("  ".into()));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        cfg.override_api_url(Some("http://10.0.0.5:8000/".into()));
        assert_eq!(cfg.base_url().unwrap().as_str(), "http://10.0.0.5:8000/");

        cfg.api_url = "not a url".into();
        assert!(matches!(cfg.base_url(), Err(ConfigError::InvalidUrl { .. })));
        cfg.api_url = "mailto:ops@example.com".into();
        assert!(cfg.base_url().is_err());
    }
}
