//! Gaming Hub command-line entry point.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gaming_hub_catalog::{CatalogStore, GameInput, HttpRemote, SnapshotStore};
use tracing_subscriber::EnvFilter;

use crate::config::HubConfig;

#[derive(Debug, Parser)]
#[command(name = "gaming-hub", version, about = "Manage the Gaming Hub game catalog")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "GAMING_HUB_CONFIG")]
    config: Option<PathBuf>,

    /// Never contact the backend; work on the local snapshot only.
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List games, optionally filtered.
    List {
        /// Case-insensitive text matched against title and description.
        #[arg(long)]
        search: Option<String>,
        /// Exact category.
        #[arg(long)]
        category: Option<String>,
    },
    /// Show every field of one game.
    Show { id: String },
    /// Add a game.
    Add(GameFields),
    /// Change fields of an existing game.
    Update {
        id: String,
        #[command(flatten)]
        fields: GameFields,
    },
    /// Delete a game.
    Remove {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Reconnect to the backend, replacing any offline edits.
    Retry,
    /// Push the sample games to the backend.
    SeedBackend {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the store mode, status and catalog figures.
    Status,
}

/// Game form fields. Omitted flags are left unset.
#[derive(Debug, Clone, Default, Args)]
struct GameFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Absolute image URL.
    #[arg(long)]
    image: Option<String>,
    /// Price per session, e.g. 19.99.
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// e.g. "60 minutes".
    #[arg(long)]
    duration: Option<String>,
    /// Easy, Medium or Hard.
    #[arg(long)]
    difficulty: Option<String>,
    /// e.g. "1-4".
    #[arg(long)]
    players: Option<String>,
}

impl From<GameFields> for GameInput {
    fn from(f: GameFields) -> Self {
        GameInput {
            title: f.title,
            description: f.description,
            image: f.image,
            price: f.price,
            category: f.category,
            duration: f.duration,
            difficulty: f.difficulty,
            players: f.players,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays scriptable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let hub_config = match &cli.config {
        Some(path) => HubConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match HubConfig::load() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                HubConfig::default()
            }
        },
    };

    let store = build_store(&hub_config, cli.offline)?;
    let result = commands::run(&store, cli.command).await;
    store.shutdown();
    result
}

fn build_store(config: &HubConfig, offline: bool) -> anyhow::Result<CatalogStore> {
    let data_dir = config
        .data_dir()
        .context("no data directory configured and no platform default found")?;
    let local = SnapshotStore::new(data_dir);

    if offline || !config.remote_enabled {
        tracing::info!("remote source disabled, using local snapshot only");
        return Ok(CatalogStore::offline(local));
    }

    let remote = HttpRemote::new(
        config.api_base_url.as_str(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    tracing::info!(url = %remote.base_url(), "using remote catalog");
    Ok(CatalogStore::new(Arc::new(remote), local))
}
