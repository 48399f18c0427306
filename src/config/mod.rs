//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, HealthSettings, HealthTargetSettings, LogFormat, LoggingConfig,
    RateLimitSettings, ServerConfig, StoreSettings,
};
