//! Products domain module.
//!
//! Business rules for the catalog, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage): product and category records, input
//! validation, keyword matching and the stock arithmetic the gateway enforces.

pub mod category;
pub mod product;
pub mod stock;

pub use category::{Category, NewCategory};
pub use product::{Product, ProductInput, search_keyword};
pub use stock::{OrderItem, consume, ensure_available, ensure_valid_quantity};
