//! tile-relay - A caching proxy for map raster tiles.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_relay::{
    config::Config,
    placeholder::Placeholder,
    proxy::TileProxy,
    server::{create_router, RouterConfig},
    store::DiskTileStore,
    telemetry::TelemetrySink,
    HttpTileFetcher,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("tile-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Cache directory: {}", config.cache_dir.display());
    info!("  Upstream: {}", config.upstream_url);
    if config.upstream_token.is_some() {
        info!("  Upstream token: set");
    }
    if config.fetch_timeout > 0 {
        info!("  Fetch timeout: {}s", config.fetch_timeout);
    } else {
        info!("  Fetch timeout: none");
    }

    // Load the placeholder image; an unreadable configured file is fatal
    let placeholder = match config.placeholder {
        Some(ref path) => match Placeholder::from_file(path) {
            Ok(placeholder) => {
                info!("  Placeholder: {}", path.display());
                placeholder
            }
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("  Placeholder: built-in transparent tile");
            Placeholder::transparent()
        }
    };

    // Assemble the proxy
    let store = DiskTileStore::new(config.cache_dir.clone());
    let fetcher = HttpTileFetcher::new(config.upstream_config());
    let proxy = Arc::new(TileProxy::new(store, fetcher, placeholder));

    // Build the router
    let telemetry = Arc::new(TelemetrySink::new());
    let router = create_router(
        Arc::clone(&proxy),
        telemetry,
        build_router_config(&config),
    );

    // Bind and serve
    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on http://{}", addr);
    info!("  Tiles:  http://{}/tiles/{{z}}/{{x}}/{{y}}.png", addr);
    info!("  Health: http://{}/health", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    // Drain background fills deliberately instead of abandoning them
    let in_flight = proxy.in_flight().await;
    if in_flight > 0 {
        info!("Waiting for {} in-flight tile fill(s)...", in_flight);
    }
    proxy.wait_for_fills().await;

    info!("Shutdown complete");
    ExitCode::SUCCESS
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {}", e);
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tile_relay=debug,tower_http=debug"
    } else {
        "tile_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    if let Some(ref dir) = config.frontend_dir {
        router_config = router_config.with_frontend_dir(dir.clone());
    }

    router_config
}
