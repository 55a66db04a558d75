//! Infrastructure layer: record stores plus the services that orchestrate them.
//!
//! - `store`: the `CatalogStore` capability set and its in-memory / Postgres backends
//! - `stock`: the stock gateway, the only path that reads or writes stock
//! - `catalog`: the catalog service used by the HTTP layer

pub mod catalog;
pub mod stock;
pub mod store;

pub use catalog::CatalogService;
pub use stock::StockGateway;
pub use store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, StockRule};
