// src/medicine/routes.rs

use axum::{routing::post, Router};

use super::handlers;

pub fn medicine_routes() -> Router {
    Router::new()
        .route("/api/medicine/search", post(handlers::search_medicine))
        .route("/api/medicine/save", post(handlers::save_medicine))
        .route("/api/medicine/delete", post(handlers::delete_medicine))
        .route("/api/medicine/status", post(handlers::medicine_status))
}
