// src/services/google.rs
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::common::{safe_email_log, AppConfig};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Google client id not configured")]
    NotConfigured,

    #[error("Token rejected by Google (HTTP {0})")]
    Rejected(u16),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed tokeninfo response: {0}")]
    MalformedResponse(String),

    #[error("Token audience mismatch")]
    AudienceMismatch,

    #[error("Unexpected token issuer: {0}")]
    InvalidIssuer(String),

    #[error("Token expired")]
    Expired,

    #[error("Token missing claim: {0}")]
    MissingClaim(&'static str),
}

/// Claims returned by Google's tokeninfo endpoint.
/// Numeric claims come back as strings there, so they are read as raw JSON.
#[derive(Debug, Default, Deserialize)]
pub struct TokenInfo {
    pub sub: Option<String>,
    pub aud: Option<String>,
    pub iss: Option<String>,
    pub exp: Option<Value>,
    pub email: Option<String>,
    pub email_verified: Option<Value>,
    pub name: Option<String>,
}

/// The verified identity of a signed-in user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleIdentity {
    pub subject_id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct GoogleService {
    client: Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleService {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            tokeninfo_url: config.google_tokeninfo_url.clone(),
            client_id: config.google_client_id.clone(),
        }
    }

    /// Verify a Google ID token and return the identity it carries.
    ///
    /// Google checks the signature; the audience, issuer and expiry are
    /// checked here against the configured client id.
    /// Docs: https://developers.google.com/identity/sign-in/web/backend-auth
    pub async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdentity, IdentityError> {
        let client_id = self.client_id.as_deref().ok_or(IdentityError::NotConfigured)?;

        debug!("Initiating Google token validation with tokeninfo endpoint");

        let resp = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    endpoint = %self.tokeninfo_url,
                    "HTTP error contacting Google tokeninfo endpoint"
                );
                IdentityError::RequestFailed(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(http_status = %status, "Google tokeninfo rejected the token");
            return Err(IdentityError::Rejected(status.as_u16()));
        }

        let info = resp.json::<TokenInfo>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Google tokeninfo JSON response");
            IdentityError::MalformedResponse(e.to_string())
        })?;

        let identity = validate_claims(info, client_id, Utc::now().timestamp())?;

        debug!(
            user_id = %identity.subject_id,
            email = %safe_email_log(&identity.email),
            "Google token validation successful"
        );

        Ok(identity)
    }
}

/// Check the tokeninfo claims against the expected audience at time `now`
/// (unix seconds).
pub fn validate_claims(
    info: TokenInfo,
    client_id: &str,
    now: i64,
) -> Result<GoogleIdentity, IdentityError> {
    match info.aud.as_deref() {
        Some(aud) if aud == client_id => {}
        Some(aud) => {
            warn!(
                token_audience = %aud,
                expected_client_id = %client_id,
                "Google token audience validation failed - rejecting token"
            );
            return Err(IdentityError::AudienceMismatch);
        }
        None => return Err(IdentityError::MissingClaim("aud")),
    }

    if let Some(iss) = info.iss.as_deref() {
        if !GOOGLE_ISSUERS.contains(&iss) {
            warn!(issuer = %iss, "Google token issued by unexpected party");
            return Err(IdentityError::InvalidIssuer(iss.to_string()));
        }
    }

    if let Some(exp) = info.exp.as_ref() {
        let exp = claim_as_i64(exp).ok_or_else(|| {
            IdentityError::MalformedResponse(format!("unreadable exp claim: {}", exp))
        })?;
        if exp <= now {
            warn!(token_exp = exp, current_time = now, "Google token has expired");
            return Err(IdentityError::Expired);
        }
    }

    if let Some(verified) = info.email_verified.as_ref() {
        if !claim_is_true(verified) {
            warn!("Google token contains unverified email address");
        }
    }

    let subject_id = info
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(IdentityError::MissingClaim("sub"))?;

    Ok(GoogleIdentity {
        subject_id,
        email: info.email.unwrap_or_default(),
        name: info.name.unwrap_or_default(),
    })
}

fn claim_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn claim_is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
