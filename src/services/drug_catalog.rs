// src/services/drug_catalog.rs
//
// Client for the public drug information API (e약은요) on data.go.kr

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::common::AppConfig;

/// Results per search; the catalog is only used for a short pick list
pub const MAX_RESULTS: u32 = 3;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Catalog API returned HTTP {0}")]
    BadStatus(u16),

    #[error("Catalog API error {code}: {message}")]
    ApiError { code: String, message: String },

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),
}

/// What the user typed into the search form
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    pub item_name: String,
    pub company_name: Option<String>,
}

impl SearchTerm {
    /// A blank company name means "any company"
    pub fn new(item_name: &str, company_name: Option<&str>) -> Self {
        Self {
            item_name: item_name.trim().to_string(),
            company_name: company_name
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrugCatalogService {
    client: Client,
    api_url: String,
    service_key: String,
}

impl DrugCatalogService {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: config.drug_api_url.clone(),
            service_key: config.drug_api_key.clone(),
        }
    }

    /// Query parameters for one search; `entp_name` only when a company is given
    pub fn query_params(&self, term: &SearchTerm) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("serviceKey", self.service_key.clone()),
            ("item_name", term.item_name.clone()),
        ];
        if let Some(company) = &term.company_name {
            params.push(("entp_name", company.clone()));
        }
        params.extend([
            ("type", "json".to_string()),
            ("pageNo", "1".to_string()),
            ("numOfRows", MAX_RESULTS.to_string()),
        ]);
        params
    }

    /// Search the catalog and return the `body.items` array untouched
    pub async fn search(&self, term: &SearchTerm) -> Result<Value, CatalogError> {
        debug!(
            item_name = %term.item_name,
            company_name = ?term.company_name,
            "Querying drug catalog"
        );

        let resp = self
            .client
            .get(&self.api_url)
            .query(&self.query_params(term))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = %self.api_url, "HTTP error contacting drug catalog");
                CatalogError::RequestFailed(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(http_status = %status, "Drug catalog returned error status");
            return Err(CatalogError::BadStatus(status.as_u16()));
        }

        let payload = resp.json::<Value>().await.map_err(|e| {
            error!(error = %e, "Failed to parse drug catalog response");
            CatalogError::MalformedResponse(e.to_string())
        })?;

        extract_items(payload)
    }
}

/// Pull `body.items` out of a catalog response, honoring the API's own
/// result code when present.
pub fn extract_items(mut payload: Value) -> Result<Value, CatalogError> {
    if let Some(header) = payload.get("header") {
        let code = header
            .get("resultCode")
            .and_then(Value::as_str)
            .unwrap_or("00");
        if code != "00" {
            let message = header
                .get("resultMsg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            warn!(result_code = %code, result_msg = %message, "Drug catalog reported an error");
            return Err(CatalogError::ApiError {
                code: code.to_string(),
                message,
            });
        }
    }

    let body = payload
        .get_mut("body")
        .ok_or_else(|| CatalogError::MalformedResponse("missing body".to_string()))?;

    match body.get_mut("items").map(Value::take) {
        None | Some(Value::Null) => Ok(Value::Array(Vec::new())),
        Some(items) => Ok(items),
    }
}
