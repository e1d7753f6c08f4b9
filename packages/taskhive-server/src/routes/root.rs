use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

pub(crate) async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Employee Task Tracker API is running!",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
