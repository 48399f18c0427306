//! In-memory product store

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::product::{NewProduct, Product, ProductId, ProductStore};
use crate::domain::DomainError;

/// Thread-safe in-memory product store
///
/// Keeps products in insertion order. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products
    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn read_all(&self) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(products.clone())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        let product = product.into_product(ProductId::generate(), Utc::now());

        let mut products = self.products.write().map_err(|e| {
            DomainError::store_unavailable(format!("Failed to acquire write lock: {}", e))
        })?;
        products.push(product.clone());

        Ok(product)
    }
}
