pub(crate) mod employees;
pub(crate) mod tasks;
pub(crate) mod users;

pub(crate) mod employee_ops;
pub(crate) mod stats_ops;
pub(crate) mod task_ops;
pub(crate) mod user_ops;

pub mod initialize;
mod migration;

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    // 内存库必须钉死在单连接上, 否则池中每个连接各有一个空库
    pub(crate) async fn memory_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options)
            .await
            .expect("connect in-memory sqlite");
        super::initialize::Migrator::up(&db, None)
            .await
            .expect("run migrations");
        db
    }
}
