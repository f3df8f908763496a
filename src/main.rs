//! weathercache - caching proxy for current weather lookups
//!
//! Serves `GET /weather?city=<name>`, answering from an in-memory cache when
//! possible and from OpenWeatherMap otherwise.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, info};

use weathercache::cache::{Sweeper, TtlCache};
use weathercache::cli::{Cli, ServerConfig};
use weathercache::lookup::WeatherService;
use weathercache::provider::OpenWeatherClient;
use weathercache::server::{self, AppState};

/// Installs the tracing subscriber, honouring `RUST_LOG` when set
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weathercache=info,tower_http=info".into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Values from .env act as environment defaults for clap
    let dotenv = dotenvy::dotenv();

    init_logging();
    if let Err(e) = dotenv {
        debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    let config = match ServerConfig::from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let provider = OpenWeatherClient::with_timeout(&config.api_key, config.upstream_timeout)?
        .with_base_url(&config.upstream_url)
        .with_units(&config.units)
        .with_lang(&config.lang);

    let cache = Arc::new(TtlCache::new(config.cache_ttl));
    let sweeper = Sweeper::spawn(cache.clone(), config.sweep_interval);

    let state = AppState {
        weather: WeatherService::new(cache, Arc::new(provider)),
    };
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        ttl_secs = config.cache_ttl.as_secs(),
        sweep_secs = config.sweep_interval.as_secs(),
        "Server running on http://localhost:{}",
        config.port
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.shutdown().await;
    served?;

    info!("Server stopped");
    Ok(())
}
