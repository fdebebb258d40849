use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ticketdesk::commands::{
    BrowseOptions, cmd_browse, cmd_config_init, cmd_config_path, cmd_config_show,
};
use ticketdesk::config::Config;
use ticketdesk::error::{DeskError, Result};

#[derive(Parser)]
#[command(name = "ticketdesk")]
#[command(about = "Terminal client for a remote ticket tracker")]
#[command(version)]
struct Cli {
    /// API base address (overrides TICKETDESK_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to open first, e.g. /tickets/42 or /dashboard
    start: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,

        /// Output as JSON
        #[arg(long, global = true)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration (default)
    Show,
    /// Print the config file path
    Path,
    /// Write a config file with default values
    Init,
}

/// Route logs to the configured file; the terminal belongs to the TUI
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ticketdesk=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| DeskError::Other(format!("Failed to initialize logging: {e}")))
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config_path = cli.config.clone().or_else(Config::config_path);

    match cli.command {
        None => {
            init_logging(&config)?;
            cmd_browse(BrowseOptions {
                config,
                api_url: cli.api_url,
                start: cli.start,
            })
        }
        Some(Commands::Config { action, json }) => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                cmd_config_show(&config, config_path.as_deref(), cli.api_url.as_deref(), json)
            }
            ConfigAction::Path => cmd_config_path(config_path.as_deref(), json),
            ConfigAction::Init => cmd_config_init(config_path, json),
        },
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
