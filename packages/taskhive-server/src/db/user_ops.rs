use crate::db::users::{self, Entity as Users, Model as UserModel, UserRole};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<UserModel>, AppError> {
    Users::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<UserModel>, AppError> {
    Users::find_by_id(user_id)
        .one(db)
        .await
        .map_err(AppError::from)
}

/// 角色只在创建时写入一次, 之后没有任何操作会改动它
pub(crate) async fn create_user<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<UserModel, AppError> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        created_at: Set(Utc::now()),
    };

    new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Duplicate("Email already registered".to_string())
        }
        _ => AppError::from(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_db;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = memory_db().await;

        let user = create_user(&db, "a@x.com", "hash", UserRole::User)
            .await
            .unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, UserRole::User);

        let found = find_by_email(&db, "a@x.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let by_id = find_by_id(&db, user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.email), Some("a@x.com".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = memory_db().await;

        create_user(&db, "a@x.com", "hash", UserRole::User)
            .await
            .unwrap();
        let err = create_user(&db, "a@x.com", "other", UserRole::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_find_unknown_email() {
        let db = memory_db().await;
        assert!(find_by_email(&db, "nobody@x.com").await.unwrap().is_none());
    }
}
