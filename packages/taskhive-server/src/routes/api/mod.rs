use crate::routes::auth;
use crate::services::auth::account::auth_middleware;
use crate::state::AppState;
use axum::{Router, middleware};
use std::sync::Arc;

mod dashboard;
mod employees;
mod health;
mod tasks;

pub(crate) fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // 实体与统计路由全部要求有效令牌
    let protected_router = Router::new()
        .nest("/employees", employees::router())
        .nest("/tasks", tasks::router())
        .nest("/dashboard", dashboard::router())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    Router::new()
        .nest("/auth", auth::router(state))
        .nest("/health", health::router())
        .merge(protected_router)
}
