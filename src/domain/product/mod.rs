//! Product domain - catalog entities, validation and the store contract

mod entity;
mod repository;
mod validation;

pub use entity::{NewProduct, Product, ProductId, ProductInput};
pub use repository::ProductStore;
pub use validation::{validate_product_input, ProductValidationError};

#[cfg(test)]
pub use repository::stub::StubProductStore;
#[cfg(test)]
pub use repository::MockProductStore;
