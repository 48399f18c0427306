//! Catalog Service
//!
//! Product catalog HTTP API with a cache-aside read path:
//! - Pluggable product store (in-memory, PostgreSQL)
//! - Pluggable cache (in-memory, Redis) with bounded staleness
//! - Rate limiting, Prometheus metrics and health probes

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use api::state::AppState;
use domain::product::{ProductInput, ProductStore};
use infrastructure::{
    cache::{CacheConfig, CacheFactory},
    rate_limiter::{RateLimitConfig, RateLimiter},
    services::{CatalogService, CatalogServiceConfig},
    store::{StoreConfig, StoreFactory},
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let store_config = StoreConfig::from_settings(&config.store)?;
    let store = StoreFactory::create(&store_config).await?;
    info!(backend = %store_config.store_type(), "Product store initialized");

    if config.store.seed_demo_data {
        seed_demo_products(store.as_ref()).await?;
    }

    let cache_config = CacheConfig::from_settings(&config.cache)?;
    let cache = CacheFactory::new().create(&cache_config).await?;
    info!(
        backend = %cache_config.cache_type,
        ttl_secs = config.cache.ttl_secs,
        "Cache initialized"
    );

    let catalog = CatalogService::with_config(
        store,
        cache,
        CatalogServiceConfig::from_settings(&config.cache, &config.store),
    );

    let mut state = AppState::new(Arc::new(catalog));

    if config.rate_limit.enabled {
        let limits = RateLimitConfig::from(&config.rate_limit);
        info!(
            max_requests = limits.max_requests,
            window_secs = limits.window.as_secs(),
            "Rate limiting enabled"
        );
        state = state.with_rate_limiter(Arc::new(RateLimiter::new(limits)));
    }

    Ok(state)
}

/// Inserts a few products when the store is empty
async fn seed_demo_products(store: &dyn ProductStore) -> anyhow::Result<()> {
    if !store.read_all().await?.is_empty() {
        return Ok(());
    }

    let demo = [
        ("Mechanical Keyboard", "Tenkeyless, brown switches", Decimal::new(8999, 2), "electronics", 25),
        ("Desk Lamp", "LED with adjustable arm", Decimal::new(3450, 2), "home", 40),
        ("Notebook", "A5 dotted, 120 pages", Decimal::new(799, 2), "stationery", 200),
    ];

    for (name, description, price, category, stock) in demo {
        let product = ProductInput::new(name, description, price, category, stock).validate()?;
        store.insert(product).await?;
    }

    info!(count = demo.len(), "Seeded demo products");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryProductStore;

    #[tokio::test]
    async fn test_create_app_state_defaults() {
        let state = create_app_state().await.unwrap();

        assert!(state.rate_limiter.is_some());
        assert!(state.catalog.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store = InMemoryProductStore::new();

        seed_demo_products(&store).await.unwrap();
        seed_demo_products(&store).await.unwrap();

        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        let mut config = AppConfig::default();
        config.cache.backend = "memcached".to_string();

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
