use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod catalog;
mod checker;
mod config;
mod error;
mod handlers;
mod metrics;
mod models;

use crate::catalog::{Catalog, CatalogSource, LoadStatus};
use crate::checker::AvailabilityChecker;
use crate::config::Config;
use crate::metrics::MetricsStore;

/// Shared application state, cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub checker: AvailabilityChecker,
    pub source: Arc<CatalogSource>,
    pub load_status: Arc<LoadStatus>,
    pub metrics: Arc<RwLock<MetricsStore>>,
}

impl AppState {
    pub fn new(source: CatalogSource, catalog: Catalog, load_status: LoadStatus) -> Self {
        Self {
            checker: AvailabilityChecker::new(catalog),
            source: Arc::new(source),
            load_status: Arc::new(load_status),
            metrics: Arc::new(RwLock::new(MetricsStore::new())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,product_validator=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    // Single load attempt, before anything is served.
    let (catalog, load_status) = catalog::load(&config.catalog_source);
    let state = AppState::new(config.catalog_source.clone(), catalog, load_status);

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Product validator listening on http://{}", addr);
    info!("Validate with: GET http://{}/api/validate/PROD-001", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Product validator stopped");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Validation ──────────────────────────────────────────────────────
        .route("/api/validate", post(handlers::products::validate_product))
        .route(
            "/api/validate/:product_id",
            get(handlers::products::validate_product_by_path),
        )

        // ── Catalog listing ─────────────────────────────────────────────────
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/ids", get(handlers::products::list_product_ids))

        // ── Metrics ─────────────────────────────────────────────────────────
        .route("/api/metrics", get(handlers::metrics::get_metrics))
        .route("/api/metrics/export/csv", get(handlers::metrics::export_csv))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl-C or SIGTERM. If a handler can't be installed that
/// branch just never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received, draining connections");
}
