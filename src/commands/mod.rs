//! Command implementations behind the CLI

mod browse;
mod config;

pub use browse::{BrowseOptions, cmd_browse};
pub use config::{cmd_config_init, cmd_config_path, cmd_config_show};

use serde_json::Value;

use crate::error::Result;

/// Output of a command: JSON for `--json`, otherwise human-readable text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, json: bool) -> Result<()> {
        match self.text {
            Some(text) if !json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}
