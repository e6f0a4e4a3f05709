use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers::{
    players::{get_never_online_with, get_player_history},
    reports::get_report,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/player_history", get(get_player_history))
        .route("/api/report/:date", get(get_report))
        .route("/api/online/never_with", get(get_never_online_with))
        .with_state(state)
}
