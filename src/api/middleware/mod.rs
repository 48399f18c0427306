//! API middleware components

pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security;

use axum::{body::Body, extract::MatchedPath, http::Request};

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::rate_limit_middleware;
pub use security::security_headers_middleware;

/// Matched route pattern when available, raw path otherwise
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
