//! Product store trait definition

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewProduct, Product};
use crate::domain::DomainError;

/// Durable source of truth for catalog products
///
/// Implementations must return products in a stable order (insertion order)
/// and assign identity and creation time on insert.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Reads every product in the store
    async fn read_all(&self) -> Result<Vec<Product>, DomainError>;

    /// Persists a validated product, returning it with identity and creation time
    async fn insert(&self, product: NewProduct) -> Result<Product, DomainError>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
