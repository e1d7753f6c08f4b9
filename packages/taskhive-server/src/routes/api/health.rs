use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_handler))
}

/// 连通性探针: 顺带报告三张核心表是否就位
async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let backend = state.db.get_database_backend();
    let rows = state
        .db
        .query_all(Statement::from_string(
            backend,
            "SELECT name FROM sqlite_master WHERE type = 'table'",
        ))
        .await?;

    let mut tables = HashSet::new();
    for row in rows {
        tables.insert(row.try_get::<String>("", "name")?);
    }

    Ok(Json(json!({
        "success": true,
        "connected": true,
        "tables": {
            "users": tables.contains("users"),
            "employees": tables.contains("employees"),
            "tasks": tables.contains("tasks"),
        }
    })))
}
