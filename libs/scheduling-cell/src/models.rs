// libs/scheduling-cell/src/models.rs
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::domain::AppointmentStatus;
use shared_models::error::AppError;
use shared_storage::StorageError;

/// One candidate slot in an availability response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAvailability {
    #[serde(with = "shared_models::domain::time_slot_format")]
    pub time_slot: NaiveTime,
    pub is_free: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveAppointmentRequest {
    pub professional_id: i64,
    /// Known patient reference. When absent, `cpf` and `name` must both be
    /// present and the patient registry resolves or creates the record.
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub date: String,
    pub time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentQueryParams {
    pub patient_id: Option<i64>,
    pub professional_id: Option<i64>,
    pub date: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Professional not found")]
    ProfessionalNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Time slot {0} is outside the professional's schedule")]
    OutOfSchedule(String),

    #[error("Time slot is already booked")]
    SlotConflict,

    #[error("Appointment in status {0} cannot change to {1}")]
    InvalidStatusTransition(AppointmentStatus, AppointmentStatus),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for SchedulingError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => SchedulingError::AppointmentNotFound,
            StorageError::SlotTaken => SchedulingError::SlotConflict,
            StorageError::Duplicate(what) => {
                SchedulingError::Unavailable(format!("unexpected duplicate: {}", what))
            }
            StorageError::Unavailable(detail) => SchedulingError::Unavailable(detail),
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match &err {
            SchedulingError::ProfessionalNotFound | SchedulingError::AppointmentNotFound => {
                AppError::NotFound(err.to_string())
            }
            SchedulingError::InvalidInput(_) => AppError::BadRequest(err.to_string()),
            SchedulingError::OutOfSchedule(_) | SchedulingError::InvalidStatusTransition(..) => {
                AppError::Unprocessable(err.to_string())
            }
            SchedulingError::SlotConflict => AppError::Conflict(err.to_string()),
            SchedulingError::Unavailable(_) => AppError::Unavailable(err.to_string()),
        }
    }
}
