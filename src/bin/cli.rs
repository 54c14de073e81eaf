//! Lost and Found CLI
//!
//! Browse and search item reports, inspect a single report and register
//! new accounts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lostfound::{
    config,
    error::Result,
    models::{Config, ENV_LOG_LEVEL, ItemKind, RegistrationForm, SearchQuery},
    pipeline,
    services::{BackendClient, FirebaseIdentity},
    utils::{console, http},
};

/// Lost and Found - classifieds for lost and found items
#[derive(Parser, Debug)]
#[command(
    name = "lostfound",
    version,
    about = "Lost and Found classifieds client"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "lostfound.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress result output (alerts are still shown)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the latest lost and found reports, newest first
    Recent {
        /// Print at most this many reports
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Search lost or found reports
    Search {
        #[arg(long, default_value = "")]
        category: String,

        /// Possible location
        #[arg(long, default_value = "")]
        location: String,

        /// Possible date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Collection to search: lost or found
        #[arg(long = "type", default_value = "lost")]
        kind: ItemKind,
    },

    /// Show a single report
    Show {
        /// Collection: lost or found
        #[arg(long = "type", default_value = "lost")]
        kind: ItemKind,

        /// Report identifier
        id: String,
    },

    /// Register a new account
    Register {
        #[arg(long)]
        fullname: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        division: String,

        #[arg(long)]
        zilla: String,

        #[arg(long)]
        upzilla: String,

        #[arg(long)]
        village: String,

        /// Profile picture file
        #[arg(long)]
        image: PathBuf,

        #[arg(long, env = "LOSTFOUND_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "LOSTFOUND_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },

    /// Browse divisions, zillas and upzillas
    Locations {
        #[arg(long)]
        division: Option<String>,

        #[arg(long)]
        zilla: Option<String>,
    },

    /// Validate configuration and location data
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Configured log level, read before the logger exists.
fn configured_level(path: &Path) -> String {
    std::env::var(ENV_LOG_LEVEL)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| Config::load(path).ok().map(|c| c.logging.level))
        .unwrap_or_else(|| "info".to_string())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, &configured_level(&cli.config));
    console::init(cli.quiet);

    if let Command::Validate = cli.command {
        return pipeline::run_validate(&cli.config);
    }

    let (config, locations) = config::load_all(&cli.config)?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let client = http::create_client(&config.backend)?;
    let backend = Arc::new(BackendClient::new(&config.backend.base_url, client.clone())?);

    match cli.command {
        Command::Recent { limit } => {
            pipeline::run_recent(&config, backend, limit).await?;
        }

        Command::Search {
            category,
            location,
            date,
            kind,
        } => {
            let query = SearchQuery {
                category,
                possible_location: location,
                possible_date: date,
                kind,
            };
            pipeline::run_search(&config, backend, &query).await?;
        }

        Command::Show { kind, id } => {
            pipeline::run_show(backend, kind, &id).await?;
        }

        Command::Register {
            fullname,
            username,
            email,
            phone,
            division,
            zilla,
            upzilla,
            village,
            image,
            password,
            confirm_password,
        } => {
            let identity = Arc::new(FirebaseIdentity::new(&config.identity, client)?);
            let form = RegistrationForm {
                fullname,
                username,
                email,
                phone,
                division,
                zilla,
                upzilla,
                village,
                image: None,
                password,
                confirm_password,
            };
            pipeline::run_register(&config, locations, identity, backend, form, &image).await?;
        }

        Command::Locations { division, zilla } => {
            pipeline::run_locations(&locations, division.as_deref(), zilla.as_deref())?;
        }

        Command::Validate => pipeline::run_validate(&cli.config)?,
    }

    Ok(())
}
