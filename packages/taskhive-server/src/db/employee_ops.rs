use crate::db::employees::{self, Entity as Employees, Model as EmployeeModel};
use crate::db::tasks::{self, Entity as Tasks};
use crate::db::user_ops;
use crate::db::users::{Model as UserModel, UserRole};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

/// 员工档案字段
#[derive(Debug, Clone)]
pub(crate) struct EmployeeProfile {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) department: Option<String>,
    pub(crate) position: Option<String>,
}

/// 部分更新: None 的字段保持原值
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmployeeChanges {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) department: Option<String>,
    pub(crate) position: Option<String>,
}

async fn insert_employee<C: ConnectionTrait>(
    db: &C,
    user_id: Option<Uuid>,
    profile: &EmployeeProfile,
) -> Result<EmployeeModel, AppError> {
    let new_employee = employees::ActiveModel {
        user_id: Set(user_id),
        name: Set(profile.name.clone()),
        email: Set(profile.email.clone()),
        department: Set(profile.department.clone()),
        position: Set(profile.position.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    new_employee.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Duplicate("Email already exists".to_string())
        }
        _ => AppError::from(e),
    })
}

/// 自助注册: 账号与档案要么同时存在, 要么都不存在
pub(crate) async fn register_user_and_employee(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
    profile: EmployeeProfile,
) -> Result<(UserModel, EmployeeModel), AppError> {
    let txn = db.begin().await?;

    let user = user_ops::create_user(&txn, email, password_hash, UserRole::User).await?;
    let employee = insert_employee(&txn, Some(user.id), &profile).await?;

    txn.commit().await?;
    Ok((user, employee))
}

/// 管理员建档; 提供临时口令时在同一事务里补建或复用账号
pub(crate) async fn create_employee(
    db: &DatabaseConnection,
    profile: EmployeeProfile,
    temp_password_hash: Option<String>,
) -> Result<EmployeeModel, AppError> {
    let Some(password_hash) = temp_password_hash else {
        return insert_employee(db, None, &profile).await;
    };

    let txn = db.begin().await?;

    let user = match user_ops::find_by_email(&txn, &profile.email).await? {
        Some(user) => user,
        None => user_ops::create_user(&txn, &profile.email, &password_hash, UserRole::User).await?,
    };
    let employee = insert_employee(&txn, Some(user.id), &profile).await?;

    txn.commit().await?;
    Ok(employee)
}

pub(crate) async fn list_employees(
    db: &DatabaseConnection,
) -> Result<Vec<EmployeeModel>, AppError> {
    Employees::find()
        .order_by_asc(employees::Column::Name)
        .all(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn find_employee(
    db: &DatabaseConnection,
    id: i32,
) -> Result<EmployeeModel, AppError> {
    Employees::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

pub(crate) async fn find_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<EmployeeModel>, AppError> {
    Employees::find()
        .filter(employees::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(AppError::from)
}

/// `restrict_to_profile` 为真时只允许改 name/department/position
pub(crate) async fn update_employee(
    db: &DatabaseConnection,
    id: i32,
    changes: EmployeeChanges,
    restrict_to_profile: bool,
) -> Result<EmployeeModel, AppError> {
    let employee = find_employee(db, id).await?;

    if restrict_to_profile && changes.email.is_some() {
        return Err(AppError::Forbidden(
            "Only admins can change an employee email".to_string(),
        ));
    }

    let mut changed = false;
    let mut active: employees::ActiveModel = employee.clone().into();
    if let Some(name) = changes.name {
        active.name = Set(name);
        changed = true;
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
        changed = true;
    }
    if let Some(department) = changes.department {
        active.department = Set(Some(department));
        changed = true;
    }
    if let Some(position) = changes.position {
        active.position = Set(Some(position));
        changed = true;
    }
    if !changed {
        return Ok(employee);
    }

    active.update(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Duplicate("Email already exists".to_string())
        }
        _ => AppError::from(e),
    })
}

/// 删除员工并在同一事务里带走其全部任务
pub(crate) async fn delete_employee(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;

    let employee = Employees::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Tasks::delete_many()
        .filter(tasks::Column::EmployeeId.eq(employee.id))
        .exec(&txn)
        .await?;
    Employees::delete_by_id(employee.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}
