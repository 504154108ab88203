// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{DrugCatalogService, GoogleService};

/// Application state containing the database pool and external service clients.
/// Built once in `main` and handed to handlers through an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub google_service: Arc<GoogleService>,
    pub drug_catalog_service: Arc<DrugCatalogService>,
}

pub type SharedState = Arc<AppState>;
