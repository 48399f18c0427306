//! Store factory for runtime backend selection

use std::sync::Arc;
use std::time::Duration;

use crate::config::StoreSettings;
use crate::domain::product::ProductStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryProductStore;
use super::postgres::{PostgresConfig, PostgresProductStore};

/// Supported store types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (for testing/development)
    #[default]
    InMemory,
    /// PostgreSQL store
    Postgres,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::InMemory => write!(f, "in_memory"),
            StoreType::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// In-memory store configuration
    InMemory,
    /// PostgreSQL store configuration
    Postgres {
        config: PostgresConfig,
        table_name: String,
    },
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig, table_name: impl Into<String>) -> Self {
        Self::Postgres {
            config,
            table_name: table_name.into(),
        }
    }

    /// Builds the factory config from the application's store settings
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, DomainError> {
        match settings.backend.parse::<StoreType>()? {
            StoreType::InMemory => Ok(Self::InMemory),
            StoreType::Postgres => {
                let url = settings.database_url.clone().ok_or_else(|| {
                    DomainError::configuration("database_url is required for the postgres store")
                })?;

                let config = PostgresConfig::new(url)
                    .with_max_connections(settings.max_connections)
                    .with_connect_timeout(Duration::from_millis(settings.connect_timeout_ms));

                Ok(Self::postgres(config, settings.table.clone()))
            }
        }
    }

    pub fn store_type(&self) -> StoreType {
        match self {
            Self::InMemory => StoreType::InMemory,
            Self::Postgres { .. } => StoreType::Postgres,
        }
    }
}

/// Factory for creating product store instances
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a store based on the configuration, creating the table if needed
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn ProductStore>, DomainError> {
        match config {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryProductStore::new())),
            StoreConfig::Postgres { config, table_name } => {
                let store = PostgresProductStore::connect(config, table_name.clone()).await?;
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!("memory".parse::<StoreType>().unwrap(), StoreType::InMemory);
        assert_eq!("PostgreSQL".parse::<StoreType>().unwrap(), StoreType::Postgres);
        assert!("mongodb".parse::<StoreType>().is_err());
    }

    #[test]
    fn test_from_settings_requires_url_for_postgres() {
        let settings = StoreSettings {
            backend: "postgres".to_string(),
            database_url: None,
            ..StoreSettings::default()
        };

        let result = StoreConfig::from_settings(&settings);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_from_settings_postgres() {
        let settings = StoreSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://db/catalog".to_string()),
            ..StoreSettings::default()
        };

        let config = StoreConfig::from_settings(&settings).unwrap();
        assert_eq!(config.store_type(), StoreType::Postgres);
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = StoreFactory::create(&StoreConfig::in_memory()).await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
    }
}
