use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::db::employee_ops::{self, EmployeeChanges, EmployeeProfile};
use crate::db::users::UserRole;
use crate::error::AppError;
use crate::policy;
use crate::services::auth::account::{CurrentUser, hash_password};
use crate::state::AppState;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_employees_handler).post(create_employee_handler))
        .route(
            "/{id}",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
}

#[derive(Debug, Deserialize)]
struct CreateEmployeeRequest {
    name: Option<String>,
    email: Option<String>,
    department: Option<String>,
    position: Option<String>,
    /// 可选的临时口令, 提供时为该员工配套建立账号
    temp_password: Option<String>,
}

async fn list_employees_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_list_all_employees(&current.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let employees = employee_ops::list_employees(&state.db).await?;
    Ok(Json(json!({ "success": true, "data": employees })))
}

async fn get_employee_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let employee = employee_ops::find_employee(&state.db, id).await?;

    if !policy::can_view_employee(&current.role, current.id, &employee) {
        return Err(AppError::Forbidden(
            "You can only view your own employee profile".to_string(),
        ));
    }

    Ok(Json(json!({ "success": true, "data": employee })))
}

async fn create_employee_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_create_employee(&current.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let (Some(name), Some(email)) = (request.name, request.email) else {
        return Err(AppError::Validation(
            "Name and email are required".to_string(),
        ));
    };

    let temp_password_hash = request
        .temp_password
        .as_deref()
        .map(hash_password)
        .transpose()?;
    let profile = EmployeeProfile {
        name,
        email,
        department: request.department,
        position: request.position,
    };
    let employee = employee_ops::create_employee(&state.db, profile, temp_password_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Employee created successfully",
            "data": employee
        })),
    ))
}

async fn update_employee_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(changes): Json<EmployeeChanges>,
) -> Result<impl IntoResponse, AppError> {
    let employee = employee_ops::find_employee(&state.db, id).await?;

    if !policy::can_update_employee(&current.role, current.id, &employee) {
        return Err(AppError::Forbidden(
            "You can only update your own employee profile".to_string(),
        ));
    }

    let restrict_to_profile = !matches!(current.role, UserRole::Admin);
    let updated =
        employee_ops::update_employee(&state.db, id, changes, restrict_to_profile).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Employee updated successfully",
        "data": updated
    })))
}

async fn delete_employee_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_delete_employee(&current.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    employee_ops::delete_employee(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Employee deleted successfully"
    })))
}
