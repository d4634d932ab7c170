// GET handlers: version and the four status queries

use axum::{Json, extract::State, response::IntoResponse};

use super::AppState;

/// GET /version — service name and version from Cargo.toml at build time.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /status/cpu
pub(super) async fn cpu_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.status.cpu().await)
}

/// GET /status/ram
pub(super) async fn ram_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.status.ram().await)
}

/// GET /status/docker — running containers, no usage figures.
pub(super) async fn docker_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.status.docker().await)
}

/// GET /status/docker/details — running containers with CPU and memory usage.
pub(super) async fn docker_details_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.status.docker_details().await)
}
