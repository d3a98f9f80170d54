use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::proxy;
use super::state::AppState;

/// Create the proxy router. Everything outside `/_proxy` is intercepted.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/_proxy/health", get(health::health_check))
        .route("/_proxy/ready", get(health::ready_check))
        .route("/_proxy/live", get(health::live_check))
        .fallback(proxy::intercept)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
