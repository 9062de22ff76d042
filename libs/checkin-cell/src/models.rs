// libs/checkin-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_storage::StorageError;

/// Wire payload carried inside the QR image. Field declaration order is the
/// serialization order; the check-in terminals parse exactly this shape, with
/// `appt_id` as a bare integer, so neither the keys nor their order may
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinPayload {
    pub cmd: String,
    pub appt_id: i64,
    pub cpf: String,
    pub name: String,
    pub hash: String,
}

/// A freshly minted token: the structured payload, the exact text encoded in
/// the QR image, and the PNG rendering of that image.
#[derive(Debug, Clone)]
pub struct MintedToken {
    pub payload: CheckinPayload,
    pub text: String,
    pub png: Vec<u8>,
}

/// Outcome of an offline payload verification. Bad input never errors past
/// this boundary; it fails closed with `valid = false` and a reason for the
/// device log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub valid: bool,
    pub reason: Option<String>,
}

impl Verification {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckinError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Check-in secret is not configured")]
    SecretMissing,

    #[error("Failed to render check-in code: {0}")]
    Render(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for CheckinError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => CheckinError::AppointmentNotFound,
            StorageError::Duplicate(what) => {
                CheckinError::Unavailable(format!("unexpected duplicate: {}", what))
            }
            StorageError::SlotTaken => {
                CheckinError::Unavailable("unexpected slot conflict".to_string())
            }
            StorageError::Unavailable(detail) => CheckinError::Unavailable(detail),
        }
    }
}

impl From<CheckinError> for AppError {
    fn from(err: CheckinError) -> Self {
        match &err {
            CheckinError::AppointmentNotFound | CheckinError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            CheckinError::Render(_) => AppError::Internal(err.to_string()),
            CheckinError::SecretMissing | CheckinError::Unavailable(_) => {
                AppError::Unavailable(err.to_string())
            }
        }
    }
}
