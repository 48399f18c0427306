//! Per-client rate limiting middleware

use std::net::{IpAddr, SocketAddr};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::rate_limiter::RateLimitResult;

/// Rejects clients that exceeded their request budget with 429.
/// Passes everything through when no limiter is configured.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.clone() else {
        return next.run(request).await;
    };

    let client = client_key(&request, limiter.config().trust_proxy);
    let result = limiter.check_and_record(&client).await;

    if !result.allowed {
        warn!(client = %client, retry_after = result.reset_in_seconds, "Rate limit exceeded");

        let mut response = ApiError::rate_limited(
            "Too many requests, please try again later.",
            result.reset_in_seconds,
        )
        .into_response();
        insert_limit_headers(response.headers_mut(), &result);
        return response;
    }

    let mut response = next.run(request).await;
    insert_limit_headers(response.headers_mut(), &result);
    response
}

fn insert_limit_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(result.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(result.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(result.reset_in_seconds));
}

/// Client address used as the limiter key
///
/// The socket peer is authoritative. Proxy headers are honored only when
/// `trust_proxy` is set and they carry a parseable IP address.
fn client_key(request: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request.headers()) {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/products");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        request
    }

    #[test]
    fn test_client_key_uses_peer_by_default() {
        let request = request_with(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-real-ip", "198.51.100.2"),
        ]);

        assert_eq!(client_key(&request, false), "192.0.2.1");
    }

    #[test]
    fn test_client_key_from_forwarded_for_when_trusted() {
        let request = request_with(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);

        assert_eq!(client_key(&request, true), "203.0.113.7");
    }

    #[test]
    fn test_client_key_from_real_ip_when_trusted() {
        let request = request_with(&[("x-real-ip", "198.51.100.2")]);

        assert_eq!(client_key(&request, true), "198.51.100.2");
    }

    #[test]
    fn test_unparseable_forwarded_for_falls_back_to_peer() {
        let request = request_with(&[("x-forwarded-for", "not-an-ip")]);

        assert_eq!(client_key(&request, true), "192.0.2.1");
    }

    #[test]
    fn test_client_key_unknown() {
        let request = Request::builder().body(Body::empty()).unwrap();

        assert_eq!(client_key(&request, false), "unknown");
    }
}
