//! Product search endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use pricecast_common::ProductRecord;
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Query parameters for GET /api/products
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Substring to match; absent lists from the start of the catalog
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub query: String,
    /// Matches in catalog order, at most `limit`
    pub products: Vec<ProductRecord>,
    /// Total matches before the limit was applied
    pub total: usize,
}

/// GET /api/products?q=...&limit=N
///
/// Lets callers discover names that `/api/predict` will resolve. Matching
/// is the same literal, case-insensitive test prediction uses, so the first
/// entry is the product a prediction for `q` would pick.
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ProductsQuery>, QueryRejection>,
) -> ApiResult<Json<ProductsResponse>> {
    let Query(params) = params?;

    let limit = match params.limit {
        Some(0) => return Err(ApiError::BadRequest("limit must be at least 1".to_string())),
        Some(n) => n.min(MAX_LIMIT),
        None => DEFAULT_LIMIT,
    };

    let query = params.q.unwrap_or_default();

    let mut total = 0;
    let mut products = Vec::new();
    for record in state.pipeline.catalog().search(&query) {
        if products.len() < limit {
            products.push(record.clone());
        }
        total += 1;
    }

    Ok(Json(ProductsResponse {
        query,
        products,
        total,
    }))
}
