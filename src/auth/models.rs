//! Authentication request and response models

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/google`
#[derive(Debug, Default, Deserialize)]
pub struct GoogleAuthRequest {
    #[serde(default, alias = "id_token")]
    pub token: Option<String>,
}

/// User as returned to the client after sign-in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GoogleAuthResponse {
    pub message: String,
    pub user: AuthenticatedUser,
}
