//! Fixtures shared by the unit tests

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::config::{AppConfig, DEFAULT_DRUG_API_URL, DEFAULT_TOKENINFO_URL};
use super::migrations::run_migrations;
use super::state::{AppState, SharedState};
use crate::services::{DrugCatalogService, GoogleService};

pub const TEST_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

/// In-memory database with the service schema.
/// One connection, so every statement sees the same database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool, false).await.unwrap();

    pool
}

/// Serves `router` on an ephemeral local port and returns its base URL
pub async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_config(tokeninfo_url: Option<&str>, drug_api_url: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        reset_db: false,
        google_client_id: Some(TEST_CLIENT_ID.to_string()),
        google_tokeninfo_url: tokeninfo_url.unwrap_or(DEFAULT_TOKENINFO_URL).to_string(),
        drug_api_url: drug_api_url.unwrap_or(DEFAULT_DRUG_API_URL).to_string(),
        drug_api_key: "test-service-key".to_string(),
        cors_origins: Vec::new(),
        port: 0,
    }
}

/// Application state over a fresh database, with the external APIs
/// pointed at the given mock URLs
pub async fn test_state(tokeninfo_url: Option<&str>, drug_api_url: Option<&str>) -> SharedState {
    let config = test_config(tokeninfo_url, drug_api_url);
    Arc::new(AppState {
        db: setup_test_db().await,
        google_service: Arc::new(GoogleService::new(&config)),
        drug_catalog_service: Arc::new(DrugCatalogService::new(&config)),
    })
}

/// Stand-in for Google's tokeninfo endpoint at `/tokeninfo`.
///
/// `good-token` is valid for [`TEST_CLIENT_ID`], `other-audience` was
/// issued to another client, anything else is rejected with 400.
pub fn mock_tokeninfo_router() -> Router {
    async fn tokeninfo(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        let exp = (Utc::now().timestamp() + 3600).to_string();
        match params.get("id_token").map(String::as_str) {
            Some("good-token") => (
                StatusCode::OK,
                Json(json!({
                    "iss": "accounts.google.com",
                    "aud": TEST_CLIENT_ID,
                    "sub": "1122334455",
                    "email": "user@example.com",
                    "email_verified": "true",
                    "name": "Test User",
                    "exp": exp,
                })),
            ),
            Some("other-audience") => (
                StatusCode::OK,
                Json(json!({
                    "iss": "accounts.google.com",
                    "aud": "someone-else.apps.googleusercontent.com",
                    "sub": "1122334455",
                    "exp": exp,
                })),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_token" })),
            ),
        }
    }

    Router::new().route("/tokeninfo", get(tokeninfo))
}
