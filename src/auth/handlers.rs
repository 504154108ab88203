//! Authentication handlers

use axum::extract::{Extension, Json};
use tracing::{error, info, warn};

use super::models::{AuthenticatedUser, GoogleAuthRequest, GoogleAuthResponse};
use crate::common::messages::{INVALID_TOKEN, USER_AUTHENTICATED};
use crate::common::{safe_email_log, safe_token_log, ApiError, SharedState};
use crate::database::{users_repo, StoreError};

/// POST /api/auth/google
/// Authenticates a user via a Google ID token and upserts the user row
///
/// # Request Body
/// ```json
/// { "token": "<google id token>" }
/// ```
///
/// # Response
/// ```json
/// {
///   "message": "User authenticated",
///   "user": { "id": "...", "email": "...", "name": "..." }
/// }
/// ```
pub async fn google_auth(
    Extension(state): Extension<SharedState>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<Json<GoogleAuthResponse>, ApiError> {
    info!("🔐 Received Google auth request");

    let token = match payload.token.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!("Google auth request without a token");
            return Err(ApiError::Unauthorized(INVALID_TOKEN.to_string()));
        }
    };

    let identity = state
        .google_service
        .verify_id_token(token)
        .await
        .map_err(|e| {
            warn!(error = %e, token = %safe_token_log(token), "Google token verification failed");
            ApiError::Unauthorized(INVALID_TOKEN.to_string())
        })?;

    users_repo::upsert_user(
        &state.db,
        &identity.subject_id,
        &identity.email,
        &identity.name,
    )
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %identity.subject_id,
            "Failed to record authenticated user"
        );
        match e {
            StoreError::Database(db) => ApiError::DatabaseError(db),
            StoreError::NotFound(msg) => ApiError::InternalServer(msg),
        }
    })?;

    info!(
        user_id = %identity.subject_id,
        email = %safe_email_log(&identity.email),
        provider = "google",
        "User authentication successful via Google"
    );

    Ok(Json(GoogleAuthResponse {
        message: USER_AUTHENTICATED.to_string(),
        user: AuthenticatedUser {
            id: identity.subject_id,
            email: identity.email,
            name: identity.name,
        },
    }))
}
