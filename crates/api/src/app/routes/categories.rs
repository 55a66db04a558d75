use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_categories).post(create_category))
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    match services.catalog.create_category(body.into()).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
