//! Route handlers

pub mod auth;
pub mod places;
pub mod users;

use crate::state::ApiState;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Liveness probe
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Wayfind API is up" }))
}

/// Assemble the full application router over the given state
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::me))
        .route("/users/me/update", put(users::update_profile))
        .route(
            "/users/favorites/:place_id",
            post(users::add_favorite).delete(users::remove_favorite),
        )
        .route("/places/", post(places::create_place))
        .route("/places/search/ai", post(places::search_ai))
        .route("/places/search/filters", post(places::search_filters))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
