// src/medicine/handlers.rs

use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde_json::json;
use tracing::{error, info, warn};

use super::models::{
    DeleteMedicineRequest, MedicineStatusRequest, SaveMedicineRequest, SearchMedicineRequest,
};
use super::validators::{DeleteMedicineValidator, SaveMedicineValidator, SearchMedicineValidator};
use crate::common::messages::{
    REMOVE_OK, REQUEST_FAILED, REQUEST_OK, REQUEST_REJECTED, SAVE_OK, SEARCH_FAILED,
};
use crate::common::{ApiError, SharedState, Validator};
use crate::database::{drug_data_repo, StoreError};
use crate::services::SearchTerm;

/// POST /api/medicine/search - Look up medicines in the public drug catalog
///
/// Returns at most three catalog items exactly as the catalog sent them.
pub async fn search_medicine(
    Extension(state): Extension<SharedState>,
    Json(request): Json<SearchMedicineRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    SearchMedicineValidator.validate(&request).into_result()?;

    let term = SearchTerm::new(
        request.it_name.as_deref().unwrap_or_default(),
        request.cp_name.as_deref(),
    );
    info!(item_name = %term.item_name, company_name = ?term.company_name, "Medicine search");

    let items = state
        .drug_catalog_service
        .search(&term)
        .await
        .map_err(|e| {
            error!(error = %e, item_name = %term.item_name, "Drug catalog search failed");
            ApiError::Upstream(SEARCH_FAILED.to_string())
        })?;

    Ok(Json(json!({
        "success": REQUEST_OK,
        "item": items,
    })))
}

/// POST /api/medicine/save - Save (or refresh) a medicine for a user
pub async fn save_medicine(
    Extension(state): Extension<SharedState>,
    Json(request): Json<SaveMedicineRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    SaveMedicineValidator.validate(&request).into_result()?;

    let record = request.into_record();
    info!(
        user_id = %record.google_id,
        item_sn = %record.item_sn,
        drug_name = %record.drug_name,
        "Saving medicine"
    );

    drug_data_repo::upsert_drug_record(&state.db, &record)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %record.google_id, "Failed to save medicine");
            ApiError::Upstream(REQUEST_REJECTED.to_string())
        })?;

    Ok(Json(json!({ "success": SAVE_OK })))
}

/// POST /api/medicine/delete - Remove a user's medicines whose name contains `it_name`
pub async fn delete_medicine(
    Extension(state): Extension<SharedState>,
    Json(request): Json<DeleteMedicineRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    DeleteMedicineValidator.validate(&request).into_result()?;

    let user_id = request.user_id.as_deref().unwrap_or_default().trim();
    let name = request.it_name.as_deref().unwrap_or_default().trim();

    let removed = drug_data_repo::delete_drug_records(&state.db, user_id, name)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "Failed to remove medicine");
            ApiError::Upstream(REQUEST_REJECTED.to_string())
        })?;

    info!(user_id = %user_id, pattern = %name, removed, "Medicine removal finished");

    Ok(Json(json!({ "success": REMOVE_OK })))
}

/// POST /api/medicine/status - List a user's saved medicines
///
/// Always answers 200; an unreadable body, an empty list or a failed
/// lookup carries an `error` field instead of `items`.
pub async fn medicine_status(
    Extension(state): Extension<SharedState>,
    payload: Result<Json<MedicineStatusRequest>, JsonRejection>,
) -> Json<serde_json::Value> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable medicine status request");
            return Json(json!({ "error": REQUEST_FAILED }));
        }
    };

    let user_id = match request.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!("Medicine status requested without userID");
            return Json(json!({ "error": REQUEST_FAILED }));
        }
    };

    match drug_data_repo::list_drug_records(&state.db, user_id).await {
        Ok(items) => {
            info!(user_id = %user_id, count = items.len(), "Medicine status fetched");
            Json(json!({
                "success": REQUEST_OK,
                "items": items,
            }))
        }
        Err(StoreError::NotFound(_)) => {
            info!(user_id = %user_id, "No saved medicines to fetch");
            Json(json!({ "error": REQUEST_FAILED }))
        }
        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to fetch medicine status");
            Json(json!({ "error": REQUEST_FAILED }))
        }
    }
}
