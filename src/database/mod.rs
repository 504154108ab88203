// src/database/mod.rs
//! Data access for users and saved medicines.
//!
//! Each operation checks one connection out of the pool, runs a single
//! statement on it and hands it back when the `PoolConnection` guard drops.

pub mod drug_data_repo;
pub mod users_repo;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no rows found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub use drug_data_repo::DrugRecord;
pub use users_repo::Profile;
