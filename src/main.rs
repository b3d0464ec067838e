//! Ogiri Backend
//!
//! A REST backend for themes and the answers submitted to them, backed by an
//! in-memory or JSON-file store.

mod api;
mod config;
mod db;
mod errors;
mod ids;
mod models;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::DataStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Ogiri Backend");
    tracing::info!("Store backend: {:?}", config.store_backend);
    tracing::info!("Bind address: {}", config.bind_addr);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from {:?}", dir);
    }

    // Initialize store
    let store = db::open_store(&config)?;

    let state = AppState { store };
    let app = create_router(state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState, config: &Config) -> Router {
    // CORS: any origin; preflight requests are answered by the layer itself
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API routes
    let api_routes = Router::new()
        // Themes
        .route("/themes", get(api::list_themes).post(api::create_theme))
        .route(
            "/themes/{id}",
            get(api::get_theme)
                .put(api::update_theme)
                .delete(api::delete_theme),
        )
        // Answers
        .route(
            "/themes/{theme_id}/answers",
            get(api::list_answers).post(api::submit_answer),
        )
        .route(
            "/themes/{theme_id}/answers/{id}",
            get(api::get_answer)
                .put(api::update_answer)
                .delete(api::delete_answer),
        )
        .fallback(api::route_not_found)
        .layer(cors);

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    let router = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .with_state(state);

    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
