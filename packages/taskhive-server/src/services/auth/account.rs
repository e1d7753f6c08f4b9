use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bcrypt::{DEFAULT_COST, hash, verify};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::AdminSeed;
use crate::db::employee_ops::{self, EmployeeProfile};
use crate::db::user_ops;
use crate::db::users::{Model as UserModel, UserRole};
use crate::error::AppError;
use crate::services::auth::token::{extract_bearer_token, issue_token, verify_token};
use crate::state::AppState;

/// 统一的登录失败提示, 不区分"账号不存在"与"密码错误"
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// 注册请求
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

/// 登录请求
#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// 经过认证的调用者, 由中间件写入请求扩展
#[derive(Debug, Clone)]
pub(crate) struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub employee_id: Option<i32>,
}

/// 哈希密码
pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AppError::Internal("Failed to process password".to_string())
    })
}

/// 验证密码
pub(crate) fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash).map_err(|e| {
        error!("Failed to verify password: {}", e);
        AppError::Internal("Failed to verify password".to_string())
    })
}

/// 核对邮箱与口令; 两种失败路径返回完全相同的错误
pub(crate) async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<UserModel, AppError> {
    let user = user_ops::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    Ok(user)
}

/// 用户注册: 账号与员工档案在一个事务里一起创建
pub(crate) async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password), Some(name)) =
        (request.email, request.password, request.name)
    else {
        return Err(AppError::Validation(
            "Email, password, and name are required".to_string(),
        ));
    };

    let password_hash = hash_password(&password)?;
    let profile = EmployeeProfile {
        name,
        email: email.clone(),
        department: request.department,
        position: request.position,
    };
    let (user, employee) =
        employee_ops::register_user_and_employee(&state.db, &email, &password_hash, profile)
            .await?;

    let token = issue_token(&user, &state.auth)?;
    info!("User registered successfully: {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "token": token,
            "user": {
                "id": user.id,
                "email": user.email,
                "role": user.role,
                "employee": employee
            }
        })),
    ))
}

/// 用户登录
pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let user = authenticate(&state.db, &email, &password).await?;
    let employee = employee_ops::find_by_user(&state.db, user.id).await?;
    let token = issue_token(&user, &state.auth)?;

    info!("User logged in successfully: {}", user.email);

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
            "employee": employee
        }
    })))
}

/// 获取当前用户信息
pub(crate) async fn get_current_user(
    State(state): State<Arc<AppState>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let employee = employee_ops::find_by_user(&state.db, current.id).await?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "id": current.id,
            "email": current.email,
            "role": current.role,
            "employee": employee
        }
    })))
}

/// 认证中间件: 校验令牌, 确认账号仍然存在, 解析关联档案
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let claims = verify_token(&token, &state.auth)?;

    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| AppError::Auth("Invalid user ID".to_string()))?;
    let user = user_ops::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;
    let employee = employee_ops::find_by_user(&state.db, user.id).await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
        employee_id: employee.map(|e| e.id),
    };
    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}

/// 启动时按环境配置补种管理员账号; 邮箱已存在则什么都不做
pub(crate) async fn seed_admin(
    db: &DatabaseConnection,
    seed: &AdminSeed,
) -> Result<(), AppError> {
    if user_ops::find_by_email(db, &seed.email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&seed.password)?;
    user_ops::create_user(db, &seed.email, &password_hash, UserRole::Admin).await?;
    info!("Seeded admin account: {}", seed.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_db;

    #[test]
    fn test_hash_and_verify_password() {
        let password_hash = hash_password("p").unwrap();
        assert_ne!(password_hash, "p");
        assert!(verify_password("p", &password_hash).unwrap());
        assert!(!verify_password("wrong", &password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_constant_failure_surface() {
        let db = memory_db().await;
        let password_hash = hash_password("p").unwrap();
        user_ops::create_user(&db, "u@x.com", &password_hash, UserRole::User)
            .await
            .unwrap();

        let wrong_password = authenticate(&db, "u@x.com", "wrong").await.unwrap_err();
        let unknown_email = authenticate(&db, "nobody@x.com", "p").await.unwrap_err();

        // 两种失败对外不可区分
        match (&wrong_password, &unknown_email) {
            (AppError::Auth(a), AppError::Auth(b)) => assert_eq!(a, b),
            other => panic!("expected auth errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let db = memory_db().await;
        let password_hash = hash_password("p").unwrap();
        user_ops::create_user(&db, "u@x.com", &password_hash, UserRole::User)
            .await
            .unwrap();

        let user = authenticate(&db, "u@x.com", "p").await.unwrap();
        assert_eq!(user.email, "u@x.com");
    }

    #[tokio::test]
    async fn test_register_then_current_user_round_trip() {
        let db = memory_db().await;
        let auth = crate::config::AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
        };

        let password_hash = hash_password("p").unwrap();
        let (user, employee) = employee_ops::register_user_and_employee(
            &db,
            "u@x.com",
            &password_hash,
            EmployeeProfile {
                name: "U".to_string(),
                email: "u@x.com".to_string(),
                department: None,
                position: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(employee.name, "U");

        // 拿着签发的令牌回来, 解析出的还是同一个档案
        let token = issue_token(&user, &auth).unwrap();
        let claims = verify_token(&token, &auth).unwrap();
        let caller_id: Uuid = claims.sub.parse().unwrap();
        let linked = employee_ops::find_by_user(&db, caller_id)
            .await
            .unwrap()
            .expect("employee linked to the registered account");
        assert_eq!(linked.id, employee.id);
        assert_eq!(linked.name, "U");
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let db = memory_db().await;
        let seed = AdminSeed {
            email: "admin@x.com".to_string(),
            password: "p".to_string(),
        };

        seed_admin(&db, &seed).await.unwrap();
        seed_admin(&db, &seed).await.unwrap();

        let admin = user_ops::find_by_email(&db, "admin@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
    }
}
