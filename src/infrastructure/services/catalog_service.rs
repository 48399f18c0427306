//! Cache-aside catalog service

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{CacheSettings, StoreSettings};
use crate::domain::cache::{Cache, CacheExt, CatalogQuery};
use crate::domain::product::{Product, ProductInput, ProductStore};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_degraded, record_cache_hit, record_cache_miss,
};

/// Configuration for the catalog service
#[derive(Debug, Clone)]
pub struct CatalogServiceConfig {
    /// Lifetime of a cached listing; also the staleness bound
    pub cache_ttl: Duration,
    /// Deadline for a single store call
    pub store_timeout: Duration,
    /// Deadline for a single cache call
    pub cache_timeout: Duration,
}

impl Default for CatalogServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(500),
        }
    }
}

impl CatalogServiceConfig {
    pub fn from_settings(cache: &CacheSettings, store: &StoreSettings) -> Self {
        Self {
            cache_ttl: Duration::from_secs(cache.ttl_secs),
            store_timeout: Duration::from_millis(store.timeout_ms),
            cache_timeout: Duration::from_millis(cache.timeout_ms),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }
}

/// Product catalog with a cache-aside read path
///
/// Reads are served from the cache when a snapshot is present and fall
/// through to the store otherwise, repopulating the cache. Writes go to the
/// store and then invalidate the listing. Cache failures never fail an
/// operation; they are logged as `cache_degraded` and counted.
pub struct CatalogService {
    store: Arc<dyn ProductStore>,
    cache: Arc<dyn Cache>,
    config: CatalogServiceConfig,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(store: Arc<dyn ProductStore>, cache: Arc<dyn Cache>) -> Self {
        Self::with_config(store, cache, CatalogServiceConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn ProductStore>,
        cache: Arc<dyn Cache>,
        config: CatalogServiceConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &CatalogServiceConfig {
        &self.config
    }

    /// Lists every product, from the cache when possible
    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let key = CatalogQuery::AllProducts.cache_key();

        if let Some(products) = self.cached_listing(key).await {
            record_cache_hit();
            debug!(key, count = products.len(), "Serving products from cache");
            return Ok(products);
        }

        record_cache_miss();
        let products = self.with_store_deadline(self.store.read_all()).await?;
        debug!(key, count = products.len(), "Read products from store");

        if let Err(e) = self
            .with_cache_deadline(self.cache.set(key, &products, self.config.cache_ttl))
            .await
        {
            self.degraded("set", key, &e);
        }

        Ok(products)
    }

    /// Validates and stores a product, then invalidates the cached listing
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        let new_product = input.validate()?;

        let insert = tokio::time::timeout(self.config.store_timeout, self.store.insert(new_product));
        let product = match insert.await {
            Ok(result) => result.map_err(DomainError::into_store_unavailable)?,
            Err(_) => {
                // The insert may have committed before the deadline fired
                self.invalidate_listing().await;
                return Err(self.store_timed_out());
            }
        };
        info!(product_id = %product.id(), name = product.name(), "Product created");

        self.invalidate_listing().await;

        Ok(product)
    }

    async fn invalidate_listing(&self) {
        let key = CatalogQuery::AllProducts.cache_key();

        if let Err(e) = self.with_cache_deadline(self.cache.delete(key)).await {
            self.degraded("delete", key, &e);
        }
    }

    /// Checks the store backend
    pub async fn ping_store(&self) -> Result<(), DomainError> {
        self.with_store_deadline(self.store.ping()).await
    }

    /// Checks the cache backend
    pub async fn ping_cache(&self) -> Result<(), DomainError> {
        self.with_cache_deadline(self.cache.ping()).await
    }

    async fn cached_listing(&self, key: &str) -> Option<Vec<Product>> {
        match self.with_cache_deadline(self.cache.get(key)).await {
            Ok(products) => products,
            Err(e) => {
                self.degraded("get", key, &e);
                None
            }
        }
    }

    async fn with_store_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result.map_err(DomainError::into_store_unavailable),
            Err(_) => Err(self.store_timed_out()),
        }
    }

    fn store_timed_out(&self) -> DomainError {
        DomainError::store_unavailable(format!(
            "Store call timed out after {:?}",
            self.config.store_timeout
        ))
    }

    async fn with_cache_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.config.cache_timeout, call)
            .await
            .map_err(|_| {
                DomainError::cache(format!(
                    "Cache call timed out after {:?}",
                    self.config.cache_timeout
                ))
            })?
    }

    fn degraded(&self, operation: &'static str, key: &str, error: &DomainError) {
        record_cache_degraded(operation);
        warn!(
            condition = "cache_degraded",
            operation,
            key,
            error = %error,
            "Cache unavailable, continuing without it"
        );
    }
}
