//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/google` - Google ID token sign-in
pub fn auth_routes() -> Router {
    Router::new().route("/api/auth/google", post(handlers::google_auth))
}
