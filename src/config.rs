//! Application configuration.
//!
//! Configuration is stored in `<config dir>/ticketdesk/config.yaml` and includes:
//! - The ticket API base address (overridable with `TICKETDESK_API_URL`)
//! - HTTP client settings
//! - Display preferences (page size, time zone, toast duration)
//! - An optional log file

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskError, Result};
use crate::types::PageSize;

/// Environment variable that overrides the configured API base address
pub const API_URL_ENV: &str = "TICKETDESK_API_URL";

/// Base address of the development API the client was built against
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:7219/api";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base address of the ticket API, e.g. `https://localhost:7219/api`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Accept self-signed certificates (local development servers)
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Total request timeout in seconds (default: 60)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Page size the ticket list starts with
    #[serde(default)]
    pub default_page_size: PageSize,

    /// IANA time zone for displayed timestamps (default: system zone)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_time_zone: Option<String>,

    /// How long toast notifications stay visible, in milliseconds
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Write logs here; logging is disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_toast_duration_ms() -> u64 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            accept_invalid_certs: false,
            request_timeout: default_request_timeout(),
            default_page_size: PageSize::default(),
            display_time_zone: None,
            toast_duration_ms: default_toast_duration_ms(),
            log_file: None,
        }
    }
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ticketdesk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the API base address.
    ///
    /// Precedence: explicit override (command line), then the
    /// `TICKETDESK_API_URL` environment variable, then the config file.
    pub fn effective_api_base_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override
            && !url.trim().is_empty()
        {
            return url.trim().to_string();
        }

        if let Ok(url) = env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            return url.trim().to_string();
        }

        self.api_base_url.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Time zone used to display server timestamps
    pub fn time_zone(&self) -> jiff::tz::TimeZone {
        match &self.display_time_zone {
            Some(name) => jiff::tz::TimeZone::get(name).unwrap_or_else(|e| {
                tracing::warn!("Unknown display_time_zone '{}': {}", name, e);
                jiff::tz::TimeZone::system()
            }),
            None => jiff::tz::TimeZone::system(),
        }
    }
}

/// Parse an API base address so that relative endpoint paths join under it.
///
/// `Url::join` replaces the last path segment unless the base ends with a
/// slash, so one is appended when missing.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| DeskError::InvalidBaseUrl(raw.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DeskError::InvalidBaseUrl(
            raw.to_string(),
            "expected an http or https address".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.request_timeout, 60);
        assert_eq!(config.default_page_size, PageSize::Ten);
        assert_eq!(config.toast_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config =
            serde_yaml_ng::from_str("api_base_url: http://tickets.internal/api\n").unwrap();
        assert_eq!(config.api_base_url, "http://tickets.internal/api");
        assert_eq!(config.toast_duration_ms, 3000);
        assert_eq!(config.default_page_size, PageSize::Ten);
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let result = serde_yaml_ng::from_str::<Config>("default_page_size: 20\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Config::default();
        assert_eq!(
            config.effective_api_base_url(Some("http://override:8080/api")),
            "http://override:8080/api"
        );
    }

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("https://localhost:7219/api").unwrap();
        assert_eq!(url.as_str(), "https://localhost:7219/api/");
        assert_eq!(
            url.join("tickets/5").unwrap().as_str(),
            "https://localhost:7219/api/tickets/5"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com/api").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
