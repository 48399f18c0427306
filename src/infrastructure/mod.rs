//! Infrastructure layer - Backend implementations and services

pub mod cache;
pub mod health_poller;
pub mod observability;
pub mod rate_limiter;
pub mod services;
pub mod store;
