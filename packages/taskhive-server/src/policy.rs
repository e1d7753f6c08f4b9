//! 纯授权判定, 无任何副作用。路由层把 false 映射为 403。

use crate::db::employees::Model as EmployeeModel;
use crate::db::users::UserRole;
use uuid::Uuid;

pub(crate) fn can_list_all_employees(role: &UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

pub(crate) fn can_view_employee(
    role: &UserRole,
    caller_user_id: Uuid,
    employee: &EmployeeModel,
) -> bool {
    matches!(role, UserRole::Admin) || employee.user_id == Some(caller_user_id)
}

pub(crate) fn can_create_employee(role: &UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

/// 字段级限制(非管理员只能改档案字段)由存储层执行
pub(crate) fn can_update_employee(
    role: &UserRole,
    caller_user_id: Uuid,
    employee: &EmployeeModel,
) -> bool {
    matches!(role, UserRole::Admin) || employee.user_id == Some(caller_user_id)
}

pub(crate) fn can_delete_employee(role: &UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

pub(crate) fn can_create_task(role: &UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

pub(crate) fn can_update_task(role: &UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

pub(crate) fn can_delete_task(role: &UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

/// 任务读取范围: 管理员看全部, 普通用户只看自己档案名下的任务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskVisibility {
    All,
    Mine(i32),
    Nothing,
}

pub(crate) fn task_visibility(
    role: &UserRole,
    caller_employee_id: Option<i32>,
) -> TaskVisibility {
    match (role, caller_employee_id) {
        (UserRole::Admin, _) => TaskVisibility::All,
        (UserRole::User, Some(employee_id)) => TaskVisibility::Mine(employee_id),
        (UserRole::User, None) => TaskVisibility::Nothing,
    }
}
