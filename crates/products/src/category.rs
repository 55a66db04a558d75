use serde::{Deserialize, Serialize};

use catalog_core::{CatalogError, CatalogResult, CategoryId, Entity};

/// Category record. Products reference categories; they never own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Fields for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn validate(&self) -> CatalogResult<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid_input("category name cannot be empty"));
        }
        Ok(())
    }
}
