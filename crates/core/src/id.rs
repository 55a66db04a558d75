//! Strongly-typed identifiers used across the catalog.
//!
//! Ids are assigned by the store (a `BIGSERIAL` column in Postgres, a counter in
//! memory), so they wrap an `i64` rather than a generated UUID.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Identifier of a product record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

/// Identifier of a category record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

macro_rules! impl_i64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| CatalogError::invalid_input(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_i64_newtype!(ProductId, "ProductId");
impl_i64_newtype!(CategoryId, "CategoryId");
