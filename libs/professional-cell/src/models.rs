// libs/professional-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_storage::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecialtyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfessionalRequest {
    pub name: String,
    pub license_number: String,
    pub specialty_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProfessionalListQuery {
    pub specialty_id: Option<i64>,
}

/// Times travel as `"HH:MM"` strings and are syntax-checked in the service
/// so malformed values come back as a 400, not a serializer rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWindowRequest {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub slot_duration_minutes: Option<u32>,
}

/// Partial update; omitted fields keep their stored value. The merged
/// window is re-validated as a whole before anything is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWindowRequest {
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub slot_duration_minutes: Option<u32>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Specialty not found")]
    SpecialtyNotFound,

    #[error("Professional not found")]
    ProfessionalNotFound,

    #[error("Availability window not found")]
    WindowNotFound,

    #[error("Specialty '{0}' already exists")]
    SpecialtyExists(String),

    #[error("License number '{0}' is already registered")]
    LicenseExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => CatalogError::WindowNotFound,
            StorageError::Duplicate(what) => {
                CatalogError::Unavailable(format!("unexpected duplicate: {}", what))
            }
            StorageError::SlotTaken => {
                CatalogError::Unavailable("unexpected slot conflict".to_string())
            }
            StorageError::Unavailable(detail) => CatalogError::Unavailable(detail),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::SpecialtyNotFound
            | CatalogError::ProfessionalNotFound
            | CatalogError::WindowNotFound => AppError::NotFound(err.to_string()),
            CatalogError::SpecialtyExists(_) | CatalogError::LicenseExists(_) => {
                AppError::Conflict(err.to_string())
            }
            CatalogError::InvalidInput(_) => AppError::BadRequest(err.to_string()),
            CatalogError::Unavailable(_) => AppError::Unavailable(err.to_string()),
        }
    }
}
