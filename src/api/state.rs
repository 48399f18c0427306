//! Application state shared by handlers

use std::sync::Arc;

use crate::infrastructure::rate_limiter::RateLimiter;
use crate::infrastructure::services::CatalogService;

/// Application state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    /// `None` when rate limiting is disabled
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self {
            catalog,
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }
}
