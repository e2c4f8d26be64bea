use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/submit", post(handlers::submit))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
