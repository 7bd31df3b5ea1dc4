//! skillboard: HTTP service for skill tracking and peer endorsements

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use skillboard::config::Config;
use skillboard::seed::seed_demo_data;
use skillboard::services::{spawn_logging_listener, Services};
use skillboard::{create_router, AppState, EntityStore};

#[derive(Parser)]
#[command(name = "skillboard")]
#[command(about = "Skill tracking and peer endorsement service")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "skillboard.toml")]
    config: PathBuf,

    /// Bind address (overrides config file)
    #[arg(long, env = "SKILLBOARD_HOST")]
    host: Option<String>,

    /// HTTP port (overrides config file)
    #[arg(short, long, env = "SKILLBOARD_PORT")]
    port: Option<u16>,

    /// Start with an empty store
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillboard=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting skillboard");
    info!("Config file: {}", cli.config.display());

    let mut config = Config::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.http_port = port;
    }
    if cli.no_seed {
        config.store.seed_demo_data = false;
    }

    let store = Arc::new(EntityStore::new());
    let services = Services::new(store, config.scoring.clone());
    spawn_logging_listener(services.events.clone());
    debug!(
        subscribers = services.events.subscriber_count(),
        "Scoring event listeners attached"
    );

    if config.store.seed_demo_data {
        seed_demo_data(&services)?;
    } else {
        info!("Demo data disabled, starting with an empty store");
    }

    let state = Arc::new(AppState::new(services, config.leaderboard.clone()));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
