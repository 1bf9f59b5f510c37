use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::api;
use crate::server::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/operators", get(api::operators))
        .route("/api/operators/basic", get(api::operators_basic))
        .route("/api/operators/attributes", get(api::operators_attributes))
        .route("/api/operators/skills", get(api::operators_skills))
        .route("/api/operators/modules", get(api::operators_modules))
        .route("/api/data/version", get(api::data_version))
        .route("/api/data/reload", post(api::reload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
