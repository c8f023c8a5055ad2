use radflow_core::{DistributionConfig, DistributionService, SystemClock};
use radflow_storage::{init_db, SqliteDoctorRepository, SqliteStudyRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod http;

/// Application state shared across all handlers
pub struct AppState {
    pub distribution_service: Arc<DistributionService>,
    pub pool: SqlitePool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    tracing::info!("Starting Radflow distribution server...");

    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/radflow.db".to_string());
    tracing::info!("Database: {}", db_path);

    let pool = init_db(&db_path).await?;

    let config = DistributionConfig::default();
    let study_repo = Arc::new(SqliteStudyRepository::new(pool.clone(), config.local_offset));
    let doctor_repo = Arc::new(SqliteDoctorRepository::new(pool.clone()));

    let distribution_service = Arc::new(DistributionService::with_config(
        Arc::new(SystemClock),
        study_repo.clone(),
        doctor_repo,
        study_repo,
        config,
    ));

    let app_state = Arc::new(AppState {
        distribution_service,
        pool,
    });

    let app = http::create_http_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
