use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;

use crate::shared_state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    /// If the database connection is ok
    database: bool,
    /// If all the other fields indicate healthy status.
    healthy: bool,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.service.healthy().await;

    (
        StatusCode::OK,
        Json(HealthResponse {
            healthy: database,
            database,
        }),
    )
}

pub fn configure() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
