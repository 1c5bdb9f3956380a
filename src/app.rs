use crate::handlers;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/reset", post(handlers::reset_form))
        .route("/api/upload", post(handlers::upload))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/reset", post(handlers::reset))
        .route("/api/labels", get(handlers::get_labels))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
