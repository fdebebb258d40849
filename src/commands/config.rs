//! Configuration commands
//!
//! - `config show`: Display the effective configuration
//! - `config path`: Print the config file location
//! - `config init`: Write a config file with default values

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{API_URL_ENV, Config};
use crate::error::{DeskError, Result};

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "unavailable".to_string(), |p| p.display().to_string())
}

/// Show the configuration the client would run with
pub fn cmd_config_show(
    config: &Config,
    path: Option<&Path>,
    api_url: Option<&str>,
    json: bool,
) -> Result<()> {
    let base_url = config.effective_api_base_url(api_url);
    let source = if api_url.is_some_and(|u| !u.trim().is_empty()) {
        "--api-url".to_string()
    } else if std::env::var(API_URL_ENV).is_ok_and(|u| !u.trim().is_empty()) {
        API_URL_ENV.to_string()
    } else {
        "config".to_string()
    };

    let json_output = json!({
        "api_base_url": base_url,
        "api_base_url_source": source,
        "accept_invalid_certs": config.accept_invalid_certs,
        "request_timeout": config.request_timeout,
        "default_page_size": config.default_page_size.get(),
        "display_time_zone": config.display_time_zone,
        "toast_duration_ms": config.toast_duration_ms,
        "log_file": config.log_file,
        "config_file": display_path(path),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    text.push_str(&format!(
        "{}: {} {}\n",
        "api_base_url".cyan(),
        base_url,
        format!("(from {source})").dimmed()
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "accept_invalid_certs".cyan(),
        config.accept_invalid_certs
    ));
    text.push_str(&format!(
        "{}: {}s\n",
        "request_timeout".cyan(),
        config.request_timeout
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "default_page_size".cyan(),
        config.default_page_size.get()
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "display_time_zone".cyan(),
        config
            .display_time_zone
            .clone()
            .unwrap_or_else(|| "system".dimmed().to_string())
    ));
    text.push_str(&format!(
        "{}: {}ms\n",
        "toast_duration".cyan(),
        config.toast_duration_ms
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "log_file".cyan(),
        config
            .log_file
            .as_ref()
            .map_or_else(|| "disabled".dimmed().to_string(), |p| p.display().to_string())
    ));
    text.push('\n');
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", display_path(path)).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Print where the config file lives
pub fn cmd_config_path(path: Option<&Path>, json: bool) -> Result<()> {
    let shown = display_path(path);
    CommandOutput::new(json!({ "config_file": shown, "exists": path.is_some_and(Path::exists) }))
        .with_text(shown)
        .print(json)
}

/// Write a config file with default values; refuses to overwrite
pub fn cmd_config_init(path: Option<PathBuf>, json: bool) -> Result<()> {
    let path = path.ok_or_else(|| {
        DeskError::Config("no config directory available; pass --config".to_string())
    })?;
    if path.exists() {
        return Err(DeskError::Config(format!(
            "config file already exists: {}",
            path.display()
        )));
    }

    Config::default().save_to(&path)?;
    tracing::info!("Wrote default config to {}", path.display());

    CommandOutput::new(json!({ "config_file": path.display().to_string(), "created": true }))
        .with_text(format!("{} {}", "Created".green(), path.display()))
        .print(json)
}
