//! Product catalog endpoints

use axum::{extract::State, http::StatusCode};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::product::{Product, ProductInput};

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.catalog.list_products().await?;
    debug!(count = products.len(), "Listed products");

    Ok(Json(products))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.catalog.create_product(input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}
