use sea_orm::{DbErr, DeriveMigrationName};
use sea_orm_migration::prelude::*;
use sea_orm_migration::{MigrationTrait, SchemaManager, schema};

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 users 表
        let users_table = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(schema::uuid(Users::Id).primary_key())
            .col(schema::string_uniq(Users::Email))
            .col(schema::string(Users::PasswordHash))
            .col(schema::string(Users::Role))
            .col(schema::timestamp_with_time_zone(Users::CreatedAt))
            .to_owned();

        // 创建 employees 表, user_id 可空, 账号删除时级联删除档案
        let employees_table = Table::create()
            .table(Employees::Table)
            .if_not_exists()
            .col(schema::pk_auto(Employees::Id))
            .col(schema::uuid_null(Employees::UserId))
            .col(schema::string(Employees::Name))
            .col(schema::string_uniq(Employees::Email))
            .col(schema::string_null(Employees::Department))
            .col(schema::string_null(Employees::Position))
            .col(schema::timestamp_with_time_zone(Employees::CreatedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk-employees-user_id")
                    .from(Employees::Table, Employees::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();

        // 创建 tasks 表, 员工删除时级联删除任务
        let tasks_table = Table::create()
            .table(Tasks::Table)
            .if_not_exists()
            .col(schema::pk_auto(Tasks::Id))
            .col(schema::string(Tasks::Title))
            .col(schema::string_null(Tasks::Description))
            .col(schema::string(Tasks::Status).default("pending"))
            .col(schema::string(Tasks::Priority).default("medium"))
            .col(schema::integer(Tasks::EmployeeId))
            .col(schema::uuid_null(Tasks::AssignedBy))
            .col(schema::date_null(Tasks::DueDate))
            .col(schema::timestamp_with_time_zone(Tasks::CreatedAt))
            .col(schema::timestamp_with_time_zone(Tasks::UpdatedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk-tasks-employee_id")
                    .from(Tasks::Table, Tasks::EmployeeId)
                    .to(Employees::Table, Employees::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();

        manager.create_table(users_table).await?;
        manager.create_table(employees_table).await?;
        manager.create_table(tasks_table).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Department,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    EmployeeId,
    AssignedBy,
    DueDate,
    CreatedAt,
    UpdatedAt,
}
