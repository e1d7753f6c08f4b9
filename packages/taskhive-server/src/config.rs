use anyhow::{Context, Result, bail};
use std::net::SocketAddr;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_URL: &str = "sqlite://taskhive.db?mode=rwc";

/// 签名密钥最短长度
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub(crate) struct AuthConfig {
    pub(crate) jwt_secret: String,
}

pub(crate) fn server_addr(override_addr: Option<String>) -> Result<SocketAddr> {
    let addr_text = override_addr
        .or_else(|| std::env::var("TASKHIVE_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    addr_text
        .parse()
        .with_context(|| format!("invalid TASKHIVE_ADDR: {addr_text}"))
}

pub(crate) fn database_url(override_url: Option<String>) -> String {
    override_url
        .or_else(|| std::env::var("TASKHIVE_DB_URL").ok())
        .unwrap_or_else(|| DEFAULT_DB_URL.to_string())
}

/// 签名密钥必须显式配置, 缺失或过短直接拒绝启动
pub(crate) fn auth_config() -> Result<AuthConfig> {
    let jwt_secret = std::env::var("TASKHIVE_JWT_SECRET")
        .context("TASKHIVE_JWT_SECRET must be set before the server can start")?;
    if jwt_secret.len() < MIN_SECRET_LEN {
        bail!("TASKHIVE_JWT_SECRET must be at least {MIN_SECRET_LEN} characters long");
    }
    Ok(AuthConfig { jwt_secret })
}

/// 管理员账号只在启动时从环境注入, 不经过任何 API
pub(crate) struct AdminSeed {
    pub(crate) email: String,
    pub(crate) password: String,
}

pub(crate) fn admin_seed() -> Option<AdminSeed> {
    let email = std::env::var("TASKHIVE_ADMIN_EMAIL").ok()?;
    let password = std::env::var("TASKHIVE_ADMIN_PASSWORD").ok()?;
    Some(AdminSeed { email, password })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr_override() {
        let addr = server_addr(Some("127.0.0.1:8080".to_string())).unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_server_addr_rejects_garbage() {
        assert!(server_addr(Some("not-an-addr".to_string())).is_err());
    }

    #[test]
    fn test_database_url_override() {
        let url = database_url(Some("sqlite::memory:".to_string()));
        assert_eq!(url, "sqlite::memory:");
    }
}
