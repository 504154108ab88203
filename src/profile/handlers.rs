// src/profile/handlers.rs

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info, warn};

use super::models::{GetProfileRequest, UpdateProfileRequest};
use super::validators::UpdateProfileValidator;
use crate::common::messages::{REQUEST_FAILED, REQUEST_OK};
use crate::common::{SharedState, Validator};
use crate::database::{users_repo, Profile};

/// POST /api/profile/get - Height, age and weight of a user
///
/// Unknown users and database failures answer 500 with all three fields
/// zeroed so the client can still render the form.
pub async fn get_profile(
    Extension(state): Extension<SharedState>,
    payload: Result<Json<GetProfileRequest>, JsonRejection>,
) -> Response {
    let failed = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": REQUEST_FAILED,
                "items": Profile::default(),
            })),
        )
            .into_response()
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable profile request");
            return failed();
        }
    };

    let user_id = match request.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!("Profile requested without userID");
            return failed();
        }
    };

    match users_repo::get_profile(&state.db, user_id).await {
        Ok(profile) => {
            info!(user_id = %user_id, "Profile fetched");
            Json(json!({
                "success": REQUEST_OK,
                "items": profile,
            }))
            .into_response()
        }
        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to fetch profile");
            failed()
        }
    }
}

/// POST /api/profile/update - Overwrite height, age and weight
///
/// Answers with an empty body: 200 on success, 400 for an unreadable body
/// or an invalid form, 500 when the database write fails.
pub async fn update_profile(
    Extension(state): Extension<SharedState>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> StatusCode {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable profile update");
            return StatusCode::BAD_REQUEST;
        }
    };

    let validation = UpdateProfileValidator.validate(&request);
    if !validation.is_valid {
        warn!(errors = ?validation.errors, "Rejected profile update");
        return StatusCode::BAD_REQUEST;
    }

    let user_id = request.user_id.as_deref().unwrap_or_default().trim();

    match users_repo::update_profile(
        &state.db,
        user_id,
        request.height,
        request.age_years(),
        request.weight,
    )
    .await
    {
        Ok(rows) => {
            info!(user_id = %user_id, rows, "Profile updated");
            StatusCode::OK
        }
        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to update profile");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
