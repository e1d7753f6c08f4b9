use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::AuthConfig;
use crate::db::users::{Model as UserModel, UserRole};
use crate::error::AppError;

/// 会话令牌固定 24 小时有效
pub(crate) const TOKEN_TTL_HOURS: i64 = 24;

/// 用户 JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct UserClaims {
    pub sub: String,    // User ID
    pub email: String,  // 登录邮箱
    pub role: UserRole, // 角色
    pub iat: i64,       // 签发时间
    pub exp: i64,       // 过期时间
}

/// 签发用户会话令牌
pub(crate) fn issue_token(user: &UserModel, auth: &AuthConfig) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(TOKEN_TTL_HOURS);

    let claims = UserClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_ref()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT: {}", e);
        AppError::Internal("Failed to create token".to_string())
    })
}

/// 校验令牌: 缺失/损坏/过期/签名不对一律 401
pub(crate) fn verify_token(token: &str, auth: &AuthConfig) -> Result<UserClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 60; // 允许60秒的时钟偏差

    decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
}

/// 从请求头中提取 Bearer Token
pub(crate) fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Auth(
            "Invalid authorization header format".to_string(),
        ));
    }

    Ok(auth_header.trim_start_matches("Bearer ").to_string())
}
