use axum::Router;
use common::tracing::{init_tracing, init_tracing_pretty};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use weather_service::api_client::OpenWeatherClient;
use weather_service::cache::WeatherCache;
use weather_service::config::Config;
use weather_service::handlers::{self, AppState};
use weather_service::openapi;
use weather_service::poller;
use weather_service::service::WeatherService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    if config.log_json {
        init_tracing();
    } else {
        init_tracing_pretty();
    }

    if config.api_key.is_empty() {
        warn!("WEATHER_API_KEY is not set, upstream requests will be rejected");
    }

    let shutdown = CancellationToken::new();

    let cache = Arc::new(WeatherCache::new(config.cache_ttl(), config.cache_capacity));
    info!(
        ttl_secs = cache.ttl().as_secs(),
        capacity = cache.capacity(),
        "Weather cache ready"
    );
    let client = OpenWeatherClient::new(
        config.api_url.clone(),
        config.api_key.clone(),
        config.upstream_timeout(),
    )?;
    let service = Arc::new(WeatherService::new(cache, client));

    let refresh = poller::spawn_refresh_loop(
        service.clone(),
        config.refresh_interval(),
        config.polling_enabled,
        shutdown.clone(),
    );
    info!(
        enabled = config.polling_enabled,
        interval_secs = config.refresh_interval_seconds,
        "Background refresh scheduled"
    );

    let app = Router::new()
        .merge(handlers::routes(AppState { service }))
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Weather service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    if let Err(e) = refresh.await {
        warn!(error = %e, "Refresh loop did not stop cleanly");
    }

    info!("Weather service stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    shutdown.cancel();
    warn!("Stopped background refresh, shutting down gracefully...");
}
