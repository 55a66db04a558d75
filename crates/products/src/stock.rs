//! Stock arithmetic.
//!
//! The quantity passed to [`consume`] is the amount taken out of stock, not a
//! signed delta: `new = current - quantity`. Negative quantities are rejected
//! here so a "consume" call can never be used to add stock.

use serde::{Deserialize, Serialize};

use catalog_core::{CatalogError, CatalogResult, ProductId};

/// One line of an order being checked for feasibility. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Reject negative quantities before they reach any stock arithmetic.
pub fn ensure_valid_quantity(product_id: ProductId, quantity: i64) -> CatalogResult<()> {
    if quantity < 0 {
        return Err(CatalogError::invalid_input(format!(
            "quantity for product {product_id} cannot be negative (got {quantity})"
        )));
    }
    Ok(())
}

/// Stock left after taking `quantity` units out of `current`.
pub fn consume(product_id: ProductId, current: i64, quantity: i64) -> CatalogResult<i64> {
    ensure_valid_quantity(product_id, quantity)?;

    let new_stock = current
        .checked_sub(quantity)
        .ok_or_else(|| CatalogError::unexpected("stock arithmetic overflow"))?;
    if new_stock < 0 {
        return Err(CatalogError::insufficient_stock(product_id, current, quantity));
    }
    Ok(new_stock)
}

/// Check that `requested` units could be taken out of `current`, without taking them.
pub fn ensure_available(product_id: ProductId, current: i64, requested: i64) -> CatalogResult<()> {
    ensure_valid_quantity(product_id, requested)?;

    if current < requested {
        return Err(CatalogError::insufficient_stock(product_id, current, requested));
    }
    Ok(())
}
