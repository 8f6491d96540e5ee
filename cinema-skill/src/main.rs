use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_skill::api::{create_router, AppState};
use cinema_skill::config::Config;
use cinema_skill::db::{Database, InMemoryLocationStore, LibSqlLocationStore, LocationStore};
use cinema_skill::geocoding::{GeocoderClient, LocationResolver};
use cinema_skill::showtimes::build_provider;

#[derive(Parser)]
#[command(name = "cinema-skill")]
#[command(about = "Voice-assistant skill that finds the nearest movie showtimes")]
struct Args {
    /// Keep user locations in process memory instead of the database
    #[arg(long)]
    in_memory: bool,

    /// Port to listen on, overrides SKILL_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema_skill=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let store: Arc<dyn LocationStore> = if args.in_memory {
        tracing::warn!("Using in-memory location store, user addresses are lost on restart");
        Arc::new(InMemoryLocationStore::new())
    } else {
        tracing::info!("Initializing database...");
        let db = Database::new(&config.database).await?;
        Arc::new(LibSqlLocationStore::new(db))
    };

    tracing::info!("Initializing geocoder: {}...", config.geocoder.base_url);
    let resolver: Arc<dyn LocationResolver> = Arc::new(GeocoderClient::new(&config.geocoder)?);

    let showtimes = build_provider(&config.showtimes)?;
    tracing::info!("Using showtime provider: {}", showtimes.name());

    if let Some(seed) = config.dialog.answer_seed {
        tracing::info!("Answer phrasing seeded with {}", seed);
    }

    let state = AppState::new(&config, store, resolver, showtimes);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Cinema skill starting on http://{}", addr);
    tracing::info!("  Webhook:      http://{}/dialog", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests...");
}
