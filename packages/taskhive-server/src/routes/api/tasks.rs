use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::db::employees::Model as EmployeeModel;
use crate::db::task_ops::{self, NewTask, TaskChanges, TaskFilter};
use crate::db::tasks::{Model as TaskModel, TaskPriority, TaskStatus};
use crate::error::AppError;
use crate::policy::{self, TaskVisibility};
use crate::services::auth::account::CurrentUser;
use crate::state::AppState;

pub(crate) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
}

#[derive(Debug, Deserialize)]
struct TaskListQuery {
    status: Option<TaskStatus>,
    employee_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    employee_id: Option<i32>,
    due_date: Option<NaiveDate>,
}

/// 列表响应带上受派员工的名字与邮箱
fn task_json(task: &TaskModel, employee: Option<&EmployeeModel>) -> serde_json::Value {
    json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "status": task.status,
        "priority": task.priority,
        "employee_id": task.employee_id,
        "assigned_by": task.assigned_by,
        "due_date": task.due_date,
        "created_at": task.created_at,
        "updated_at": task.updated_at,
        "employee_name": employee.map(|e| e.name.clone()),
        "employee_email": employee.map(|e| e.email.clone()),
    })
}

/// 把调用者可见范围叠加到请求过滤器上; None 表示结果必然为空
fn effective_filter(visibility: TaskVisibility, query: TaskListQuery) -> Option<TaskFilter> {
    match visibility {
        TaskVisibility::All => Some(TaskFilter {
            status: query.status,
            employee_id: query.employee_id,
        }),
        TaskVisibility::Mine(own) => {
            if query.employee_id.is_some_and(|requested| requested != own) {
                None
            } else {
                Some(TaskFilter {
                    status: query.status,
                    employee_id: Some(own),
                })
            }
        }
        TaskVisibility::Nothing => None,
    }
}

async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TaskListQuery>,
) -> Result<impl IntoResponse, AppError> {
    // 可见范围是过滤器而不是门禁: 范围外的请求得到空集而非 403
    let filter = effective_filter(
        policy::task_visibility(&current.role, current.employee_id),
        query,
    );

    let rows = match filter {
        Some(filter) => task_ops::list_tasks(&state.db, filter).await?,
        None => Vec::new(),
    };
    let data: Vec<_> = rows
        .iter()
        .map(|(task, employee)| task_json(task, employee.as_ref()))
        .collect();

    Ok(Json(json!({ "success": true, "data": data })))
}

async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let (task, employee) = task_ops::find_task(&state.db, id).await?;

    // 范围之外的任务一律当作不存在
    match policy::task_visibility(&current.role, current.employee_id) {
        TaskVisibility::All => {}
        TaskVisibility::Mine(own) if task.employee_id == own => {}
        _ => return Err(AppError::NotFound("Task not found".to_string())),
    }

    Ok(Json(json!({
        "success": true,
        "data": task_json(&task, employee.as_ref())
    })))
}

async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_create_task(&current.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let (Some(title), Some(employee_id)) = (request.title, request.employee_id) else {
        return Err(AppError::Validation(
            "Title and employee are required".to_string(),
        ));
    };

    let task = task_ops::create_task(
        &state.db,
        NewTask {
            title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            employee_id,
            due_date: request.due_date,
        },
        Some(current.id),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Task created successfully",
            "data": task
        })),
    ))
}

async fn update_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(changes): Json<TaskChanges>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_update_task(&current.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let task = task_ops::update_task(&state.db, id, changes).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Task updated successfully",
        "data": task
    })))
}

async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_delete_task(&current.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    task_ops::delete_task(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Task deleted successfully"
    })))
}
