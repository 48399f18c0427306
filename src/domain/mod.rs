//! Domain layer - Core entities and collaborator contracts

pub mod cache;
pub mod error;
pub mod product;

pub use cache::{Cache, CacheExt, CatalogQuery};
pub use error::DomainError;
pub use product::{
    validate_product_input, NewProduct, Product, ProductId, ProductInput, ProductStore,
    ProductValidationError,
};
