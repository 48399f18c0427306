//! Product store implementations

mod factory;
mod in_memory;
mod postgres;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use in_memory::InMemoryProductStore;
pub use postgres::{PostgresConfig, PostgresProductStore};
