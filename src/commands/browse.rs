//! Interactive client (`ticketdesk` with no subcommand)

use std::sync::Arc;

use iocraft::prelude::*;

use crate::api::HttpTicketApi;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::query::QueryClient;
use crate::router::Route;
use crate::tui::App;

pub struct BrowseOptions {
    pub config: Config,
    /// `--api-url` value, if given
    pub api_url: Option<String>,
    /// Path to open first, e.g. `/tickets/42`
    pub start: Option<String>,
}

/// Launch the terminal client
pub fn cmd_browse(options: BrowseOptions) -> Result<()> {
    let api = HttpTicketApi::from_config(&options.config, options.api_url.as_deref())?;
    let start = options.start.as_deref().map(Route::parse);
    tracing::info!(
        "Starting client against {} at {}",
        api.base_url(),
        start.as_ref().map_or_else(|| "/tickets".to_string(), Route::path)
    );

    let client = QueryClient::new(Arc::new(api));
    let config = options.config;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| DeskError::Other(format!("Failed to create runtime: {e}")))?;

    rt.block_on(async {
        element!(App(
            client: Some(client),
            start,
            page_size: config.default_page_size,
            time_zone: Some(config.time_zone()),
            toast_duration: config.toast_duration(),
        ))
        .fullscreen()
        .await
        .map_err(|e| DeskError::Other(format!("TUI error: {e}")))
    })
}
