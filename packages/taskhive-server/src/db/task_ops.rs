use crate::db::employees::{Entity as Employees, Model as EmployeeModel};
use crate::db::tasks::{self, Entity as Tasks, Model as TaskModel, TaskPriority, TaskStatus};
use crate::error::AppError;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// 列表过滤条件, 各字段按 AND 组合
#[derive(Debug, Clone, Default)]
pub(crate) struct TaskFilter {
    pub(crate) status: Option<TaskStatus>,
    pub(crate) employee_id: Option<i32>,
}

#[derive(Debug, Default)]
pub(crate) struct NewTask {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) priority: Option<TaskPriority>,
    pub(crate) employee_id: i32,
    pub(crate) due_date: Option<NaiveDate>,
}

/// 部分更新: None 的字段保持原值
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct TaskChanges {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) priority: Option<TaskPriority>,
    pub(crate) employee_id: Option<i32>,
    pub(crate) due_date: Option<NaiveDate>,
}

pub(crate) async fn list_tasks(
    db: &DatabaseConnection,
    filter: TaskFilter,
) -> Result<Vec<(TaskModel, Option<EmployeeModel>)>, AppError> {
    let mut query = Tasks::find().find_also_related(Employees);
    if let Some(status) = filter.status {
        query = query.filter(tasks::Column::Status.eq(status));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(tasks::Column::EmployeeId.eq(employee_id));
    }
    query
        .order_by_desc(tasks::Column::CreatedAt)
        .all(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn find_task(
    db: &DatabaseConnection,
    id: i32,
) -> Result<(TaskModel, Option<EmployeeModel>), AppError> {
    Tasks::find_by_id(id)
        .find_also_related(Employees)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
}

pub(crate) async fn create_task(
    db: &DatabaseConnection,
    new_task: NewTask,
    assigned_by: Option<Uuid>,
) -> Result<TaskModel, AppError> {
    // 受派员工必须存在
    if Employees::find_by_id(new_task.employee_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(AppError::Validation("Employee not found".to_string()));
    }

    let now = Utc::now();
    let task = tasks::ActiveModel {
        title: Set(new_task.title),
        description: Set(new_task.description),
        status: Set(new_task.status.unwrap_or(TaskStatus::Pending)),
        priority: Set(new_task.priority.unwrap_or(TaskPriority::Medium)),
        employee_id: Set(new_task.employee_id),
        assigned_by: Set(assigned_by),
        due_date: Set(new_task.due_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    task.insert(db).await.map_err(AppError::from)
}

pub(crate) async fn update_task(
    db: &DatabaseConnection,
    id: i32,
    changes: TaskChanges,
) -> Result<TaskModel, AppError> {
    let (task, _) = find_task(db, id).await?;

    if let Some(employee_id) = changes.employee_id {
        if Employees::find_by_id(employee_id).one(db).await?.is_none() {
            return Err(AppError::Validation("Employee not found".to_string()));
        }
    }

    let mut active: tasks::ActiveModel = task.into();
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(priority) = changes.priority {
        active.priority = Set(priority);
    }
    if let Some(employee_id) = changes.employee_id {
        active.employee_id = Set(employee_id);
    }
    if let Some(due_date) = changes.due_date {
        active.due_date = Set(Some(due_date));
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(AppError::from)
}

pub(crate) async fn delete_task(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let deleted = Tasks::delete_by_id(id).exec(db).await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound("Task not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::employee_ops::{self, EmployeeProfile};
    use crate::db::test_support::memory_db;

    async fn employee(db: &DatabaseConnection, name: &str, email: &str) -> i32 {
        employee_ops::create_employee(
            db,
            EmployeeProfile {
                name: name.to_string(),
                email: email.to_string(),
                department: None,
                position: None,
            },
            None,
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let db = memory_db().await;
        let employee_id = employee(&db, "A", "a@x.com").await;

        let task = create_task(
            &db,
            NewTask {
                title: "T".to_string(),
                employee_id,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.employee_id, employee_id);
    }

    #[tokio::test]
    async fn test_create_task_requires_live_employee() {
        let db = memory_db().await;
        let err = create_task(
            &db,
            NewTask {
                title: "T".to_string(),
                employee_id: 42,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_tasks_filters_and_order() {
        let db = memory_db().await;
        let first = employee(&db, "A", "a@x.com").await;
        let second = employee(&db, "B", "b@x.com").await;

        create_task(
            &db,
            NewTask {
                title: "T1".to_string(),
                employee_id: first,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        create_task(
            &db,
            NewTask {
                title: "T2".to_string(),
                status: Some(TaskStatus::Completed),
                employee_id: second,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

        // 新建的排在前面
        let all = list_tasks(&db, TaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0.title, "T2");

        let completed = list_tasks(
            &db,
            TaskFilter {
                status: Some(TaskStatus::Completed),
                employee_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].0.title, "T2");

        // 过滤条件按 AND 组合
        let none = list_tasks(
            &db,
            TaskFilter {
                status: Some(TaskStatus::Completed),
                employee_id: Some(first),
            },
        )
        .await
        .unwrap();
        assert!(none.is_empty());

        let mine = list_tasks(
            &db,
            TaskFilter {
                status: None,
                employee_id: Some(first),
            },
        )
        .await
        .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].1.as_ref().map(|e| e.name.as_str()), Some("A"));
    }

    #[tokio::test]
    async fn test_update_task_merges_fields() {
        let db = memory_db().await;
        let employee_id = employee(&db, "A", "a@x.com").await;

        let task = create_task(
            &db,
            NewTask {
                title: "T".to_string(),
                description: Some("desc".to_string()),
                employee_id,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

        let updated = update_task(
            &db,
            task.id,
            TaskChanges {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.description, task.description);
        assert_eq!(updated.priority, task.priority);
        assert_eq!(updated.employee_id, task.employee_id);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let db = memory_db().await;
        let err = update_task(&db, 999, TaskChanges::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let db = memory_db().await;
        let employee_id = employee(&db, "A", "a@x.com").await;
        let task = create_task(
            &db,
            NewTask {
                title: "T".to_string(),
                employee_id,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

        delete_task(&db, task.id).await.unwrap();
        let err = delete_task(&db, task.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
