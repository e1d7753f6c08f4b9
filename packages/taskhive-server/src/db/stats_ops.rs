use crate::db::employees::Entity as Employees;
use crate::db::tasks::{self, Entity as Tasks, TaskStatus};
use crate::error::AppError;
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use taskhive_core::{DashboardStats, StatusCount};

/// 全局统计, 管理员视角
pub(crate) async fn admin_stats(db: &DatabaseConnection) -> Result<DashboardStats, AppError> {
    let total_employees = Employees::find().count(db).await?;
    let total_tasks = Tasks::find().count(db).await?;
    let completed_tasks = Tasks::find()
        .filter(tasks::Column::Status.eq(TaskStatus::Completed))
        .count(db)
        .await?;
    let tasks_by_status = status_breakdown(db, None).await?;

    Ok(DashboardStats::Admin {
        total_employees,
        total_tasks,
        completed_tasks,
        completion_rate: DashboardStats::completion_rate(completed_tasks, total_tasks),
        tasks_by_status,
    })
}

/// 限定到单个员工的统计; 没有关联档案的账号得到全零形态
pub(crate) async fn employee_stats(
    db: &DatabaseConnection,
    employee_id: Option<i32>,
) -> Result<DashboardStats, AppError> {
    let Some(employee_id) = employee_id else {
        return Ok(DashboardStats::User {
            my_tasks: 0,
            completed_tasks: 0,
            completion_rate: 0.0,
            tasks_by_status: Vec::new(),
        });
    };

    let my_tasks = Tasks::find()
        .filter(tasks::Column::EmployeeId.eq(employee_id))
        .count(db)
        .await?;
    let completed_tasks = Tasks::find()
        .filter(tasks::Column::EmployeeId.eq(employee_id))
        .filter(tasks::Column::Status.eq(TaskStatus::Completed))
        .count(db)
        .await?;
    let tasks_by_status = status_breakdown(db, Some(employee_id)).await?;

    Ok(DashboardStats::User {
        my_tasks,
        completed_tasks,
        completion_rate: DashboardStats::completion_rate(completed_tasks, my_tasks),
        tasks_by_status,
    })
}

async fn status_breakdown(
    db: &DatabaseConnection,
    employee_id: Option<i32>,
) -> Result<Vec<StatusCount>, AppError> {
    let mut query = Tasks::find()
        .select_only()
        .column(tasks::Column::Status)
        .column_as(tasks::Column::Id.count(), "count")
        .group_by(tasks::Column::Status);
    if let Some(employee_id) = employee_id {
        query = query.filter(tasks::Column::EmployeeId.eq(employee_id));
    }

    let rows: Vec<(TaskStatus, i64)> = query.into_tuple().all(db).await?;
    Ok(rows
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_value(),
            count,
        })
        .collect())
}
