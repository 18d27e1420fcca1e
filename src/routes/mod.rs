use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    config::ServiceKind,
    error::ErrorData,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod doc;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

// State and layers are applied in `app::build_app`.
pub fn create_service_router(kind: ServiceKind) -> Router<AppState> {
    let routes = match kind {
        ServiceKind::Orders => Router::new().nest("/order", orders::router()),
        ServiceKind::Products => products::router(),
        ServiceKind::Users => Router::new().nest("/user", users::router()),
    };

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .merge(routes)
        .merge(doc::scalar_docs(kind))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

async fn method_not_allowed() -> (StatusCode, Json<ApiResponse<ErrorData>>) {
    let body = ApiResponse::success(
        "Method Not Allowed",
        ErrorData {
            error: "Method not allowed".into(),
        },
        Some(Meta::empty()),
    );
    (StatusCode::METHOD_NOT_ALLOWED, Json(body))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "error": "Route not found", "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
