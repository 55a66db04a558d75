use axum::http::StatusCode;

pub async fn banner() -> &'static str {
    "Welcome to the product catalog service"
}

pub async fn status() -> &'static str {
    "Product catalog service is running"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
