use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub health: HealthSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Cache backend and cache-aside settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    /// Lifetime of a cached product listing
    pub ttl_secs: u64,
    pub max_capacity: u64,
    /// Deadline for a single cache call
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

/// Product store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// `in_memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub table: String,
    /// Deadline for a single store call
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Insert a few demo products at startup when the store is empty
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
    /// Key clients on `x-forwarded-for` / `x-real-ip`; only safe behind a proxy that sets them
    pub trust_proxy: bool,
}

/// Targets polled by the `status` command
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    pub targets: Vec<HealthTargetSettings>,
    pub interval_secs: u64,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthTargetSettings {
    pub name: String,
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            ttl_secs: 300,
            max_capacity: 10_000,
            timeout_ms: 500,
            connect_timeout_ms: 5_000,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            database_url: None,
            max_connections: 10,
            table: "products".to_string(),
            timeout_ms: 5_000,
            connect_timeout_ms: 5_000,
            seed_demo_data: false,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 15 * 60,
            trust_proxy: false,
        }
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            targets: vec![
                HealthTargetSettings {
                    name: "API Service".to_string(),
                    url: "http://localhost:3000/health".to_string(),
                },
                HealthTargetSettings {
                    name: "Database".to_string(),
                    url: "http://localhost:3000/ready".to_string(),
                },
            ],
            interval_secs: 10,
            timeout_ms: 3_000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
