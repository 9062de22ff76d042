// libs/patient-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_storage::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub cpf: String,
    #[serde(default)]
    pub biometric_opt_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Invalid CPF: expected exactly 11 digits, got '{0}'")]
    InvalidCpf(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Patient with CPF {0} already exists")]
    CpfAlreadyExists(String),

    #[error("Fingerprint template is empty")]
    EmptyTemplate,

    #[error("No fingerprint template on file")]
    FingerprintMissing,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for PatientError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => PatientError::NotFound,
            other => PatientError::Unavailable(other.to_string()),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match &err {
            PatientError::NotFound | PatientError::FingerprintMissing => {
                AppError::NotFound(err.to_string())
            }
            PatientError::InvalidCpf(_)
            | PatientError::InvalidName(_)
            | PatientError::EmptyTemplate => AppError::BadRequest(err.to_string()),
            PatientError::CpfAlreadyExists(_) => AppError::Conflict(err.to_string()),
            PatientError::Unavailable(_) => AppError::Unavailable(err.to_string()),
        }
    }
}
