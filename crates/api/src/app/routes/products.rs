use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use catalog_core::ProductId;
use catalog_products::OrderItem;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product))
        .route("/all", get(list_products))
        .route("/search", get(search_all_products))
        .route("/search/:keyword", get(search_products))
        .route("/validate-stock", post(validate_stock))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/stock", put(adjust_stock))
}

fn parse_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse().map_err(|_| errors::invalid_id("product"))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    match services.catalog.create_product(body.into()).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.update_product(id, body.into()).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.get_product(id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.get_all_products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(keyword): Path<String>,
) -> axum::response::Response {
    match services.catalog.search_products(Some(&keyword)).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn search_all_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.search_products(None).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::StockQuery>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(quantity) = query.quantity else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "quantity query parameter is required",
        );
    };
    match services.catalog.adjust_stock(id, quantity).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn validate_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Json(items): Json<Vec<OrderItem>>,
) -> axum::response::Response {
    match services.catalog.validate_stock(&items).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
