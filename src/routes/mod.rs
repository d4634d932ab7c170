// HTTP routes

mod http;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::status::HostStatus;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) status: HostStatus,
}

pub fn app(status: HostStatus) -> Router {
    let state = AppState { status };
    Router::new()
        .route("/", get(|| async { "NAS Status API" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/status/cpu", get(http::cpu_handler)) // GET /status/cpu
        .route("/status/ram", get(http::ram_handler)) // GET /status/ram
        .route("/status/docker", get(http::docker_handler)) // GET /status/docker
        .route("/status/docker/details", get(http::docker_details_handler)) // GET /status/docker/details
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
