//! Product payload validation

use std::fmt;

use rust_decimal::Decimal;

use super::entity::ProductInput;
use crate::domain::DomainError;

/// Product validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    /// Price below zero
    NegativePrice { value: Decimal },
    /// Stock below zero
    NegativeStock { value: i64 },
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativePrice { value } => {
                write!(f, "Invalid price {}: must be greater than or equal to 0", value)
            }
            Self::NegativeStock { value } => {
                write!(f, "Invalid stock {}: must be greater than or equal to 0", value)
            }
        }
    }
}

impl std::error::Error for ProductValidationError {}

impl From<ProductValidationError> for DomainError {
    fn from(error: ProductValidationError) -> Self {
        DomainError::invalid_argument(error.to_string())
    }
}

/// Validate the data-model invariants of a create payload
pub fn validate_product_input(input: &ProductInput) -> Result<(), ProductValidationError> {
    if input.price < Decimal::ZERO {
        return Err(ProductValidationError::NegativePrice { value: input.price });
    }

    if input.stock < 0 {
        return Err(ProductValidationError::NegativeStock { value: input.stock });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(price: Decimal, stock: i64) -> ProductInput {
        ProductInput::new("Widget", "", price, "tools", stock)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_product_input(&input(Decimal::new(10, 0), 5)).is_ok());
    }

    #[test]
    fn test_negative_price() {
        let result = validate_product_input(&input(Decimal::new(-1, 0), 5));
        assert_eq!(
            result,
            Err(ProductValidationError::NegativePrice {
                value: Decimal::new(-1, 0)
            })
        );
    }

    #[test]
    fn test_negative_stock() {
        let result = validate_product_input(&input(Decimal::ONE, -1));
        assert_eq!(result, Err(ProductValidationError::NegativeStock { value: -1 }));
    }

    #[test]
    fn test_negative_zero_price_is_accepted() {
        let price: Decimal = "-0.00".parse().unwrap();
        assert!(validate_product_input(&input(price, 0)).is_ok());
    }

    #[test]
    fn test_converts_into_invalid_argument() {
        let error: DomainError = ProductValidationError::NegativePrice {
            value: Decimal::new(-1, 0),
        }
        .into();

        assert!(error.is_invalid_argument());
    }

    #[test]
    fn test_error_display() {
        let error = ProductValidationError::NegativeStock { value: -3 };
        assert_eq!(
            error.to_string(),
            "Invalid stock -3: must be greater than or equal to 0"
        );
    }
}
