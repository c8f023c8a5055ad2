use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use radflow_core::DistributionError;
use radflow_storage::table_exists;
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

/// Create the HTTP router with the distribution endpoints
pub fn create_http_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/distribute/", get(distribute_info).post(run_distribution))
        .route("/distribute/preview/", get(distribution_preview))
}

/// Health check endpoint; verifies the schema is reachable
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match table_exists(&state.pool, "studies").await {
        Ok(true) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "message": "studies table is missing" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "message": e.to_string() })),
        ),
    }
}

/// Run a full distribution and return the result envelope
async fn run_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.distribution_service.distribute().await?;
    Ok(Json(report))
}

/// Preview counts plus a hint that distribution runs on POST
async fn distribute_info(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let preview = state.distribution_service.preview().await?;
    Ok(Json(json!({
        "pending_studies": preview.pending_studies,
        "available_doctors": preview.available_doctors,
        "message": "Send a POST request to start distribution",
    })))
}

/// Read-only distribution preview
async fn distribution_preview(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let preview = state.distribution_service.preview().await?;
    Ok(Json(preview))
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Distribution(DistributionError),
}

impl From<DistributionError> for AppError {
    fn from(err: DistributionError) -> Self {
        AppError::Distribution(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let AppError::Distribution(err) = self;
        let body = Json(json!({
            "error": err.to_string(),
            "message": "Distribution run failed",
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
