//! DentalCare clinic backend
//!
//! Local service behind the clinic dashboard: one process-wide session
//! persisted in SQLite, role-gated route resolution, the doctor credential
//! store and the shared inventory.

mod api;
mod auth;
mod config;
mod consultations;
mod db;
mod doctors;
mod errors;
mod ids;
mod inventory;
mod models;
mod routing;
mod session;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use consultations::ConsultationLog;
use db::SqliteStore;
use doctors::DoctorDirectory;
use inventory::InventoryStore;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SqliteStore>,
    pub session: Arc<SessionStore<SqliteStore>>,
    pub doctors: Arc<DoctorDirectory<SqliteStore>>,
    pub inventory: Arc<InventoryStore<SqliteStore>>,
    pub consultations: Arc<ConsultationLog<SqliteStore>>,
}

impl AppState {
    /// Wire every store to `storage`, restore the session and load the
    /// inventory.
    pub async fn start(storage: SqliteStore) -> Result<Self, errors::AppError> {
        let storage = Arc::new(storage);

        let session = Arc::new(SessionStore::new(storage.clone()));
        session.restore().await;

        let inventory = Arc::new(InventoryStore::new(storage.clone()));
        inventory.load().await?;

        Ok(Self {
            session,
            inventory,
            doctors: Arc::new(DoctorDirectory::new(storage.clone())),
            consultations: Arc::new(ConsultationLog::new(storage.clone())),
            storage,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DentalCare clinic backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::warn!(
        "Credentials are checked against locally stored data and a fixed admin pair; \
         do not expose this service beyond the clinic workstation"
    );

    // Initialize storage and stores
    let pool = db::init_database(&config.db_path).await?;
    let state = AppState::start(SqliteStore::new(pool)).await?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session
        .route("/session", get(api::get_session))
        .route("/session/login", post(api::login))
        .route("/session/logout", post(api::logout))
        .route("/navigation", get(api::get_navigation))
        .route("/route", get(api::resolve_route))
        // Doctors
        .route("/doctors", get(api::list_doctors).post(api::register_doctor))
        .route(
            "/doctors/{id}",
            put(api::update_doctor).delete(api::delete_doctor),
        )
        // Inventory
        .route(
            "/inventory",
            get(api::list_inventory).put(api::replace_inventory),
        )
        .route("/inventory/categories", get(api::list_categories))
        .route("/inventory/items", post(api::create_item))
        .route("/inventory/items/by-name", post(api::add_item_by_name))
        .route(
            "/inventory/items/{id}",
            put(api::update_item).delete(api::delete_item),
        )
        .route("/inventory/usage", post(api::record_usage))
        // Consultations
        .route(
            "/consultations",
            get(api::list_consultations).post(api::record_consultation),
        )
        // External partitions
        .route("/storage/{key}", get(api::get_partition));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod test_support;
