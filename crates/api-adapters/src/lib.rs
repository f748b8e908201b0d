//! # api-adapters
//!
//! HTTP surface of the feedback board: route table, request schemas, and the
//! middleware stack. Transport only — every rule lives in `services`.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod middleware;

pub use handlers::AppState;

/// Builds the full application router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/feedback", post(handlers::create_feedback).get(handlers::list_feedback))
        .route("/feedback/upvote", post(handlers::upvote_feedback))
        .route("/feedback/comment", post(handlers::comment_feedback))
        .route("/feedback/reply", post(handlers::reply_feedback))
        .route("/feedback/status", put(handlers::set_status))
        .route("/feedback/status-count", get(handlers::status_counts))
        // Literal segments above win over the id capture.
        .route("/feedback/{id}", get(handlers::get_feedback).put(handlers::update_feedback))
        .route("/categories", get(handlers::list_categories))
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_policy())
        .layer(axum::middleware::from_fn(middleware::preflight_no_content))
        .with_state(state)
}
