// src/common/config.rs
//! Process configuration read from the environment at startup

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const DEFAULT_DRUG_API_URL: &str =
    "https://apis.data.go.kr/1471000/DrbEasyDrugInfoService/getDrbEasyDrugList";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub reset_db: bool,
    pub google_client_id: Option<String>,
    pub google_tokeninfo_url: String,
    pub drug_api_url: String,
    pub drug_api_key: String,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let google_client_id = optional("GOOGLE_CLIENT_ID");
        if google_client_id.is_none() {
            warn!("GOOGLE_CLIENT_ID not set; every identity token will be rejected");
        }

        let drug_api_key = optional("GOV_DECODED_ID").unwrap_or_else(|| {
            warn!("GOV_DECODED_ID not set; drug catalog requests will be unauthenticated");
            String::new()
        });

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://medicine_api.db".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5),
            reset_db: flag("RESET_DB"),
            google_client_id,
            google_tokeninfo_url: optional("GOOGLE_TOKENINFO_URL")
                .unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string()),
            drug_api_url: optional("GOV_DRUG_API_LINK")
                .unwrap_or_else(|| DEFAULT_DRUG_API_URL.to_string()),
            drug_api_key,
            cors_origins,
            port: parse_or("PORT", 5000),
        }
    }

    /// True when CORS should allow any origin
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}; using default {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
