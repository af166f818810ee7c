mod cache;
mod config;
mod errors;
mod handlers;
mod ml;
mod models;
mod upstream;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::ml::model::{EtsTrendModel, TrendModel};
use crate::upstream::EnergyApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "enertrend=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");

    // Fit the trend model once from its training artifact
    let model: Arc<dyn TrendModel> = Arc::new(EtsTrendModel::load(&config.model.artifact_path)?);
    tracing::info!(path = %config.model.artifact_path, "Forecast model loaded");

    let upstream = EnergyApiClient::new(&config.upstream)?;
    let cache = ResponseCache::new(Duration::from_secs(config.cache.forecast_ttl_secs));

    let state = AppState {
        upstream,
        model,
        cache,
        horizon: config.model.horizon_months,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Pages
        .route("/", get(handlers::pages::home))
        .route("/forecast", get(handlers::pages::forecast_page))
        .route("/data", get(handlers::pages::data_page))
        .route("/about", get(handlers::pages::about_page))
        // Series
        .route("/actual_data", get(handlers::series::actual_data))
        .route("/forecast_data", get(handlers::series::forecast_data))
        // Summary and evaluation
        .route("/summary_data", get(handlers::evaluation::summary_data))
        .route("/model_evaluation", get(handlers::evaluation::model_evaluation))
        // Cache administration
        .route("/clear_cache", get(handlers::cache_admin::clear_cache))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting enertrend server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
