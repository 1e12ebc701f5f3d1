use axum::{Router, http::HeaderValue, routing::get};
use configuration::{AppConfig, ErrorEnvelope};
use database::{ConnectionProvider, DbRepository, SensorRepository};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// Immutable after startup; nothing in it changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn SensorRepository>,
    /// Look-back used when a readings request has no `start`.
    pub default_window: chrono::Duration,
    pub error_envelope: ErrorEnvelope,
}

impl AppState {
    pub fn new(repo: Arc<dyn SensorRepository>, config: &AppConfig) -> Self {
        Self {
            repo,
            default_window: config.default_window(),
            error_envelope: config.errors.envelope,
        }
    }
}

/// Builds the CORS policy: only the listed origins, any method and header,
/// credentials allowed.
///
/// Methods and headers mirror the preflight request, since a literal `*`
/// cannot be combined with credentials.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Assembles the application routes around the given state.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/db", get(handlers::db_check))
        .route("/zones", get(handlers::list_zones))
        .route("/readings/:zone_id", get(handlers::get_readings))
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialized by the caller.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let provider = ConnectionProvider::from_config(&config)?;
    let query_timeout = provider.deadline();
    let repo: Arc<dyn SensorRepository> = Arc::new(DbRepository::new(provider));

    let cors = cors_layer(&config.cors.allowed_origins)?;
    let app = router(AppState::new(repo, &config), cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        origins = ?config.cors.allowed_origins,
        query_timeout = ?query_timeout,
        "Project Nexus API listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
