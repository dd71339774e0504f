//! pricecast-web library - HTTP front end for the price prediction pipeline
//!
//! Serves the HTML product form, a JSON prediction API, product search,
//! health and build information. All request handling is read-only against
//! the catalog and models loaded at startup.

use std::sync::Arc;

use axum::Router;
use pricecast_common::Pipeline;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog and models, immutable after startup
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let pages = Router::new().route("/", get(api::serve_index).post(api::submit_form));

    let json_api = Router::new()
        .route("/api/predict", post(api::predict))
        .route("/api/products", get(api::list_products))
        .route("/api/buildinfo", get(api::get_build_info));

    Router::new()
        .merge(pages)
        .merge(json_api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
