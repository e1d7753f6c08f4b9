use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::db::stats_ops;
use crate::db::users::UserRole;
use crate::error::AppError;
use crate::services::auth::account::CurrentUser;
use crate::state::AppState;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(stats_handler))
}

/// 每次请求现算, 不做缓存
async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let stats = match current.role {
        UserRole::Admin => stats_ops::admin_stats(&state.db).await?,
        UserRole::User => stats_ops::employee_stats(&state.db, current.employee_id).await?,
    };

    Ok(Json(json!({ "success": true, "data": stats })))
}
