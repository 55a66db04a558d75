//! Catalog error model.

use thiserror::Error;

use crate::id::{CategoryId, ProductId};

/// Result type used across the catalog layers.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error.
///
/// Every operation of the catalog service and the stock gateway returns one of
/// these kinds. The HTTP layer maps them to status codes; nothing below it
/// retries or recovers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The referenced product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The referenced category does not exist.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Consuming `requested` units would take the product's stock below zero.
    #[error("insufficient stock for product {product_id} (available: {available}, requested: {requested})")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// A value failed validation (blank name, negative quantity, bad id...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Anything else, e.g. the store being unavailable.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CatalogError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    pub fn insufficient_stock(product_id: ProductId, available: i64, requested: i64) -> Self {
        Self::InsufficientStock {
            product_id,
            available,
            requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_record() {
        let err = CatalogError::ProductNotFound(ProductId::new(99));
        assert_eq!(err.to_string(), "product not found: 99");

        let err = CatalogError::insufficient_stock(ProductId::new(1), 5, 100);
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 1 (available: 5, requested: 100)"
        );
    }
}
