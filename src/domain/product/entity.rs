//! Product entity and create payload

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_product_input, ProductValidationError};

/// Product identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ProductId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog product as persisted by the store
///
/// `id` and `created_at` are fixed at insert time and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    stock: u64,
    created_at: DateTime<Utc>,
}

impl Product {
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Untrusted create payload, as received from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    pub stock: i64,
}

impl ProductInput {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        stock: i64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            stock,
        }
    }

    /// Check the price and stock invariants, producing an insertable product
    pub fn validate(self) -> Result<NewProduct, ProductValidationError> {
        validate_product_input(&self)?;

        let stock = u64::try_from(self.stock)
            .map_err(|_| ProductValidationError::NegativeStock { value: self.stock })?;

        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            stock,
        })
    }
}

/// A validated payload, ready for the store to assign identity and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    description: String,
    price: Decimal,
    category: String,
    stock: u64,
}

impl NewProduct {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    /// Materialize the product with store-assigned identity and creation time
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            stock: self.stock,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_input() -> ProductInput {
        ProductInput::new("Desk Lamp", "LED, dimmable", Decimal::new(2999, 2), "lighting", 12)
    }

    #[test]
    fn test_validate_accepts_zero_price_and_stock() {
        let input = ProductInput::new("Sticker", "", Decimal::ZERO, "misc", 0);
        let new_product = input.validate().unwrap();

        assert_eq!(new_product.price(), Decimal::ZERO);
        assert_eq!(new_product.stock(), 0);
    }

    #[test]
    fn test_into_product_keeps_payload_fields() {
        let id = ProductId::generate();
        let created_at = Utc::now();
        let product = sample_input().validate().unwrap().into_product(id, created_at);

        assert_eq!(product.id(), &id);
        assert_eq!(product.name(), "Desk Lamp");
        assert_eq!(product.description(), "LED, dimmable");
        assert_eq!(product.price(), Decimal::new(2999, 2));
        assert_eq!(product.category(), "lighting");
        assert_eq!(product.stock(), 12);
        assert_eq!(product.created_at(), created_at);
    }

    #[test]
    fn test_product_json_uses_camel_case() {
        let product = sample_input()
            .validate()
            .unwrap()
            .into_product(ProductId::generate(), Utc::now());

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("id").is_some());
        assert_eq!(json["stock"], 12);
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let input: ProductInput = serde_json::from_str(r#"{"price": 5, "stock": 3}"#).unwrap();

        assert_eq!(input.name, "");
        assert_eq!(input.category, "");
        assert_eq!(input.price, Decimal::new(5, 0));
        assert_eq!(input.stock, 3);
    }

    #[test]
    fn test_input_accepts_string_price() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name": "Mug", "price": "12.50", "stock": 1}"#).unwrap();

        assert_eq!(input.price, Decimal::new(1250, 2));
    }
}
