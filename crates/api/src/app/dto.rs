use serde::Deserialize;

use catalog_core::CategoryId;
use catalog_products::{NewCategory, ProductInput};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/products` and `PUT /api/products/:id`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl From<ProductRequest> for ProductInput {
    fn from(body: ProductRequest) -> Self {
        ProductInput {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock.unwrap_or(0),
            image_url: body.image_url,
            category_id: body.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

impl From<CategoryRequest> for NewCategory {
    fn from(body: CategoryRequest) -> Self {
        NewCategory { name: body.name }
    }
}

/// Query string of `PUT /api/products/:id/stock`.
#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub quantity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_stock_defaults_to_zero() {
        let body: ProductRequest = serde_json::from_str(r#"{"name": "Camiseta"}"#).unwrap();
        let input = ProductInput::from(body);
        assert_eq!(input.stock, 0);
        assert_eq!(input.category_id, None);
    }

    #[test]
    fn full_body_maps_every_field() {
        let body: ProductRequest = serde_json::from_str(
            r#"{
                "name": "Camiseta",
                "description": "Camiseta blanca",
                "price": 19.99,
                "stock": 50,
                "image_url": "http://imagen.jpg",
                "category_id": 1
            }"#,
        )
        .unwrap();
        let input = ProductInput::from(body);
        assert_eq!(input.price, Some(19.99));
        assert_eq!(input.stock, 50);
        assert_eq!(input.category_id, Some(CategoryId::new(1)));
    }
}
