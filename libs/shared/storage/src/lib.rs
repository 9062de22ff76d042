use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use shared_config::AppConfig;
use shared_models::domain::{
    Appointment, AppointmentFilter, AppointmentStatus, AvailabilityWindow, NewAppointment,
    NewAvailabilityWindow, NewPatient, NewProfessional, NewSpecialty, Patient, Professional,
    Specialty, WindowChanges,
};

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("slot already claimed")]
    SlotTaken,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for the clinic. Implementations must make
/// [`insert_appointment`](ClinicStore::insert_appointment) an atomic
/// check-and-claim on `(professional_id, date, time_slot)` for `scheduled`
/// appointments: the booking path relies on the store, not on callers, to
/// serialize concurrent reservations of the same slot.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn insert_specialty(&self, new: NewSpecialty) -> Result<Specialty, StorageError>;
    async fn list_specialties(&self) -> Result<Vec<Specialty>, StorageError>;
    async fn find_specialty(&self, id: i64) -> Result<Option<Specialty>, StorageError>;

    async fn insert_professional(&self, new: NewProfessional)
        -> Result<Professional, StorageError>;
    async fn list_professionals(
        &self,
        specialty_id: Option<i64>,
    ) -> Result<Vec<Professional>, StorageError>;
    async fn find_professional(&self, id: i64) -> Result<Option<Professional>, StorageError>;

    async fn insert_window(
        &self,
        new: NewAvailabilityWindow,
    ) -> Result<AvailabilityWindow, StorageError>;
    async fn find_window(&self, id: i64) -> Result<Option<AvailabilityWindow>, StorageError>;
    async fn update_window(
        &self,
        id: i64,
        changes: WindowChanges,
    ) -> Result<AvailabilityWindow, StorageError>;
    async fn delete_window(&self, id: i64) -> Result<(), StorageError>;
    /// Ordered by `(day_of_week, start_time)`.
    async fn windows_for_professional(
        &self,
        professional_id: i64,
    ) -> Result<Vec<AvailabilityWindow>, StorageError>;
    /// Ordered by `start_time`.
    async fn windows_for_day(
        &self,
        professional_id: i64,
        day_of_week: u8,
    ) -> Result<Vec<AvailabilityWindow>, StorageError>;

    async fn insert_patient(&self, new: NewPatient) -> Result<Patient, StorageError>;
    async fn list_patients(&self, offset: usize, limit: usize)
        -> Result<Vec<Patient>, StorageError>;
    async fn find_patient(&self, id: i64) -> Result<Option<Patient>, StorageError>;
    async fn find_patient_by_cpf(&self, cpf: &str) -> Result<Option<Patient>, StorageError>;
    async fn store_fingerprint(
        &self,
        patient_id: i64,
        template: Vec<u8>,
    ) -> Result<Patient, StorageError>;
    /// `Ok(None)` when the patient exists but has no template on file.
    async fn load_fingerprint(&self, patient_id: i64) -> Result<Option<Vec<u8>>, StorageError>;

    /// Creates the appointment with `status = scheduled`. Fails with
    /// [`StorageError::SlotTaken`] when another `scheduled` appointment
    /// holds `(professional_id, date, time_slot)`; the check and the insert
    /// are one atomic unit.
    async fn insert_appointment(&self, new: NewAppointment) -> Result<Appointment, StorageError>;
    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StorageError>;
    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, StorageError>;
    /// All `scheduled` appointments for the professional on the date,
    /// ordered by `time_slot`.
    async fn scheduled_for_day(
        &self,
        professional_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StorageError>;
    /// Leaving `scheduled` releases the slot claim; re-entering `scheduled`
    /// must re-acquire it atomically or fail with `SlotTaken`.
    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StorageError>;
}

/// Shared axum state: configuration plus the injected store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ClinicStore>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ClinicStore>) -> Self {
        Self { config, store }
    }
}
