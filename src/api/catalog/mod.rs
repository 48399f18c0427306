//! Catalog API routes

mod products;

use axum::{routing::get, Router};

use crate::api::state::AppState;

pub use products::{create_product, list_products};

/// Routes mounted under `/api`
pub fn create_catalog_router() -> Router<AppState> {
    Router::new().route("/products", get(list_products).post(create_product))
}
