use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::services::auth::account::{auth_middleware, get_current_user, login, register};
use crate::state::AppState;

pub(crate) fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected_router = Router::new()
        .route("/me", get(get_current_user))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected_router)
}
