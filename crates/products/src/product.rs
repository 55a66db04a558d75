use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{CatalogError, CatalogResult, CategoryId, Entity, ProductId};

/// Product record as persisted by the catalog store.
///
/// `stock >= 0` holds after every successful operation; the store enforces it
/// for stock writes and [`ProductInput::validate`] for create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a freshly stored record from validated input and a store-assigned id.
    pub fn from_input(id: ProductId, input: ProductInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            image_url: input.image_url,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every descriptive field and the stock with `input`.
    ///
    /// There is no field-level merge: an absent `category_id` in the input
    /// leaves the product uncategorized.
    pub fn replace_with(&mut self, input: ProductInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.stock = input.stock;
        self.image_url = input.image_url;
        self.category_id = input.category_id;
        self.updated_at = now;
    }

    /// Case-insensitive substring match on the product name.
    pub fn name_contains(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Caller-supplied fields for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductInput {
    pub fn validate(&self) -> CatalogResult<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid_input("name cannot be empty"));
        }
        if self.stock < 0 {
            return Err(CatalogError::invalid_input("stock cannot be negative"));
        }
        Ok(())
    }
}

/// Normalize a search keyword: `None` or blank means "no filter".
pub fn search_keyword(keyword: Option<&str>) -> Option<&str> {
    keyword.filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, stock: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: Some("Camiseta blanca".to_string()),
            price: Some(19.99),
            stock,
            image_url: Some("http://imagen.jpg".to_string()),
            category_id: Some(CategoryId::new(1)),
        }
    }

    fn product(name: &str) -> Product {
        Product::from_input(ProductId::new(1), input(name, 10), Utc::now())
    }

    #[test]
    fn validate_accepts_complete_input() {
        assert_eq!(input("Camiseta", 50).validate(), Ok(()));
        assert_eq!(input("Camiseta", 0).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = input("   ", 5).validate().unwrap_err();
        match err {
            CatalogError::InvalidInput(_) => {}
            _ => panic!("Expected InvalidInput error for blank name"),
        }
    }

    #[test]
    fn validate_rejects_negative_stock() {
        let err = input("Camiseta", -1).validate().unwrap_err();
        assert_eq!(err, CatalogError::invalid_input("stock cannot be negative"));
    }

    #[test]
    fn from_input_copies_every_field() {
        let now = Utc::now();
        let p = Product::from_input(ProductId::new(3), input("Zapatos", 30), now);
        assert_eq!(p.id, ProductId::new(3));
        assert_eq!(p.name, "Zapatos");
        assert_eq!(p.stock, 30);
        assert_eq!(p.category_id, Some(CategoryId::new(1)));
        assert_eq!(p.created_at, now);
        assert_eq!(p.updated_at, now);
    }

    #[test]
    fn replace_with_overwrites_wholesale() {
        let mut p = product("Viejo nombre");
        let created_at = p.created_at;
        let later = created_at + chrono::Duration::seconds(5);

        let replacement = ProductInput {
            name: "Nuevo nombre".to_string(),
            description: None,
            price: Some(50.0),
            stock: 10,
            image_url: None,
            category_id: None,
        };
        p.replace_with(replacement, later);

        assert_eq!(p.name, "Nuevo nombre");
        assert_eq!(p.description, None);
        assert_eq!(p.price, Some(50.0));
        assert_eq!(p.stock, 10);
        assert_eq!(p.category_id, None);
        assert_eq!(p.created_at, created_at);
        assert_eq!(p.updated_at, later);
    }

    #[test]
    fn name_contains_is_case_insensitive_substring() {
        let p = product("Camiseta Blanca");
        assert!(p.name_contains("camiseta"));
        assert!(p.name_contains("BLANCA"));
        assert!(p.name_contains("seta bla"));
        assert!(!p.name_contains("negra"));
    }

    #[test]
    fn blank_keywords_mean_no_filter() {
        assert_eq!(search_keyword(None), None);
        assert_eq!(search_keyword(Some("")), None);
        assert_eq!(search_keyword(Some("   \t")), None);
        assert_eq!(search_keyword(Some(" cam ")), Some(" cam "));
    }

    #[test]
    fn product_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(product("Camiseta")).unwrap();
        assert_eq!(json["name"], "Camiseta");
        assert_eq!(json["category_id"], 1);
        assert_eq!(json["image_url"], "http://imagen.jpg");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any slice of the name, in any case, matches the product.
            #[test]
            fn every_substring_matches(
                name in "[A-Za-z][A-Za-z ]{0,40}",
                start in 0usize..40,
                len in 1usize..10,
                upper in any::<bool>(),
            ) {
                let p = product(&name);
                let start = start.min(name.len() - 1);
                let end = (start + len).min(name.len());
                let slice = &name[start..end];
                let keyword = if upper { slice.to_uppercase() } else { slice.to_lowercase() };
                prop_assert!(p.name_contains(&keyword));
            }
        }
    }
}
