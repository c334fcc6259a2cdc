//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/slack/actions", post(handlers::action::slack_actions))
        .route(
            "/gateway/slack-actions",
            post(handlers::gateway::gateway_actions),
        )
        .route("/findings", post(handlers::finding::receive_finding))
        .route("/healthz", get(handlers::health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
