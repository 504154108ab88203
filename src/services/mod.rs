// src/services/mod.rs
//
// Clients for the external services the handlers depend on

pub mod drug_catalog;
pub mod google;

// Re-export commonly used types for convenience
pub use drug_catalog::{DrugCatalogService, SearchTerm};
pub use google::GoogleService;
