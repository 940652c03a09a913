pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::routes::auth::AccessKey;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub access: Arc<AccessKey>,
}

impl AppState {
    pub fn new(db: Database, admin_password: &str) -> Self {
        Self {
            db: Arc::new(db),
            access: Arc::new(AccessKey::new(admin_password)),
        }
    }
}

/// Build the full router: protected API, health check, and the client bundle
/// served for every other path.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let protected_routes = Router::new()
        // Log routes
        .route("/api/logs", get(routes::logs::list).post(routes::logs::create))
        .route(
            "/api/logs/:id",
            put(routes::logs::update)
                .get(routes::logs::get)
                .delete(routes::logs::delete),
        )
        .route("/api/search", get(routes::logs::search))
        // View routes
        .route("/api/view", get(routes::view::view))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    let client_bundle = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .fallback_service(client_bundle)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState::new(db, &config.admin_password);
    let app = router(state, &config.static_dir);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
