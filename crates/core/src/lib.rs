//! `catalog-core` — shared building blocks for the catalog service.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! identifiers, the entity trait, and the error taxonomy every layer returns.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{CatalogError, CatalogResult};
pub use id::{CategoryId, ProductId};
