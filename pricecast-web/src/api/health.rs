//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub role: String,
    pub kind: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Catalog size
    pub products: usize,
    pub models: Vec<ModelStatus>,
}

/// GET /health
///
/// The service only starts once the catalog and every model loaded, so a
/// response here always reports "ok".
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let models = state
        .pipeline
        .models()
        .iter()
        .map(|(role, model)| ModelStatus {
            role: role.to_string(),
            kind: model.kind().to_string(),
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "pricecast-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        products: state.pipeline.catalog().len(),
        models,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
