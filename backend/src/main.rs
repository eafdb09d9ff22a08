//! Cultivation Planner - Backend Server
//!
//! Lets home growers assemble cultivation plans from a crop catalog and see
//! the expected harvest, its caloric value and a monthly work calendar.

use axum::{routing::get, Router};
use shared::CropCatalog;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod middleware;
mod repository;
mod routes;
mod services;

pub use config::Config;

use external::CropLookupClient;
use repository::{CustomCropStore, MemoryPlanRepository, PgPlanRepository, PlanRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<dyn PlanRepository>,
    pub custom_crops: Arc<dyn CustomCropStore>,
    pub catalog: services::SharedCatalog,
    pub crop_lookup: Option<CropLookupClient>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpl_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Cultivation Planner Server");
    tracing::info!("Environment: {}", config.environment);

    // Select plan storage
    let (plans, custom_crops): (Arc<dyn PlanRepository>, Arc<dyn CustomCropStore>) =
        if config.database.is_configured() {
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&config.database.url)
                .await?;
            tracing::info!("Database connection established");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&db_pool).await?;
            tracing::info!("Migrations completed");

            let repository = Arc::new(PgPlanRepository::new(db_pool));
            (repository.clone(), repository)
        } else {
            tracing::warn!("No database configured, plans are kept in memory");
            let repository = Arc::new(MemoryPlanRepository::new());
            (repository.clone(), repository)
        };

    // Built-in crops plus those registered through earlier lookups
    let catalog: CropCatalog = services::load_catalog(custom_crops.as_ref()).await?;

    let crop_lookup = match &config.crop_lookup {
        Some(lookup) => {
            tracing::info!("Crop lookup enabled: {}", lookup.api_endpoint);
            Some(CropLookupClient::from_config(lookup)?)
        }
        None => {
            tracing::info!("Crop lookup disabled");
            None
        }
    };

    // Create application state
    let state = AppState {
        plans,
        custom_crops,
        catalog: Arc::new(RwLock::new(catalog)),
        crop_lookup,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Cultivation Planner API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
