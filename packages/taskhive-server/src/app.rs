use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub(crate) fn axum_app(state: Arc<AppState>) -> Router {
    Router::new()
        // 公开路由 (不需要授权)
        .route("/", get(routes::root::root))
        // 业务路由, 授权在 api::router 内部按需套用
        .nest("/api", routes::api::router(Arc::clone(&state)))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}
