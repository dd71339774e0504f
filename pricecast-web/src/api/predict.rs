//! JSON prediction endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use pricecast_common::PredictionOutcome;
use serde::Deserialize;

use crate::{ApiResult, AppState};

/// POST /api/predict request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub product_name: String,
}

/// POST /api/predict
///
/// Looks up the first product whose name contains `product_name`
/// (case-insensitive) and returns its record with the three estimates.
/// Returns 404 when nothing matches and 400 for an unreadable body.
pub async fn predict(
    State(state): State<AppState>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<Json<PredictionOutcome>> {
    let Json(request) = request?;
    let outcome = state.pipeline.predict_for(&request.product_name)?;
    Ok(Json(outcome))
}
