// src/profile/routes.rs

use axum::{routing::post, Router};

use super::handlers;

pub fn profile_routes() -> Router {
    Router::new()
        .route("/api/profile/get", post(handlers::get_profile))
        .route("/api/profile/update", post(handlers::update_profile))
}
