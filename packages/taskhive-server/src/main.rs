mod app;
mod config;
mod db;
mod error;
mod policy;
mod routes;
mod services;
mod state;

use crate::state::AppState;
use clap::Parser;
use dotenvy::dotenv;
use sea_orm::Database;
use std::sync::Arc;
use tracing::info;

#[derive(clap::Parser)]
struct CliArgs {
    /// 监听地址, 覆盖 TASKHIVE_ADDR
    #[clap(long)]
    addr: Option<String>,
    /// 数据库连接串, 覆盖 TASKHIVE_DB_URL
    #[clap(long)]
    db_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { taskhive_service(args).await })
}

async fn taskhive_service(args: CliArgs) -> anyhow::Result<()> {
    // 配置问题(缺签名密钥等)直接拒绝启动
    let auth = config::auth_config()?;
    let addr = config::server_addr(args.addr)?;
    let db_url = config::database_url(args.db_url);

    let db_cnn = Database::connect(&db_url).await?;
    db::initialize::initial(&db_cnn).await?;

    if let Some(seed) = config::admin_seed() {
        services::auth::account::seed_admin(&db_cnn, &seed).await?;
    }

    let state = Arc::new(AppState { db: db_cnn, auth });
    let app = app::axum_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
