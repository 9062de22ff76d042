// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_models::domain::{
    weekday_index, Appointment, AppointmentFilter, AppointmentStatus, NewAppointment,
};
use shared_storage::{AppState, ClinicStore, StorageError};

use crate::models::SchedulingError;
use crate::services::lifecycle::LifecycleService;
use crate::services::slots::SlotGenerator;
use crate::services::validate::SlotSyntax;

pub struct BookingService {
    store: Arc<dyn ClinicStore>,
    generator: SlotGenerator,
    syntax: SlotSyntax,
    lifecycle: LifecycleService,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            generator: SlotGenerator::new(),
            syntax: SlotSyntax::new(),
            lifecycle: LifecycleService::new(),
        }
    }

    /// Reserve a slot for a patient. The checks run in a fixed order so
    /// each failure carries its own kind, and the final conflict check is
    /// not performed here: it happens inside the store, atomically with the
    /// insert.
    pub async fn reserve(
        &self,
        professional_id: i64,
        patient_id: i64,
        date_str: &str,
        slot_str: &str,
    ) -> Result<Appointment, SchedulingError> {
        debug!(
            "Reserving {} {} with professional {} for patient {}",
            date_str, slot_str, professional_id, patient_id
        );

        // **Step 1: Professional Lookup**
        self.store
            .find_professional(professional_id)
            .await?
            .ok_or(SchedulingError::ProfessionalNotFound)?;

        // **Step 2: Input Syntax**
        let date = self.syntax.parse_date(date_str)?;
        let time_slot = self.syntax.parse_time(slot_str)?;

        // **Step 3: Schedule Membership**
        let day_of_week = weekday_index(date);
        let windows = self
            .store
            .windows_for_day(professional_id, day_of_week)
            .await?;
        if !self.generator.offered_slots(&windows).contains(&time_slot) {
            warn!(
                "Professional {} does not offer {} on weekday {}",
                professional_id, slot_str, day_of_week
            );
            return Err(SchedulingError::OutOfSchedule(slot_str.to_string()));
        }

        // **Step 4: Atomic Claim**
        // The store refuses the insert when another scheduled appointment
        // already holds the key; there is no separate check-then-write.
        let appointment = self
            .store
            .insert_appointment(NewAppointment {
                patient_id,
                professional_id,
                date,
                time_slot,
            })
            .await
            .map_err(|err| match err {
                StorageError::SlotTaken => SchedulingError::SlotConflict,
                other => other.into(),
            })?;

        info!(
            "Appointment {} booked: professional {} on {} at {}",
            appointment.id, professional_id, date_str, slot_str
        );
        Ok(appointment)
    }

    pub async fn get(&self, appointment_id: i64) -> Result<Appointment, SchedulingError> {
        self.store
            .find_appointment(appointment_id)
            .await?
            .ok_or(SchedulingError::AppointmentNotFound)
    }

    pub async fn list(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.store.list_appointments(filter).await?)
    }

    /// Administrative status change; `scheduled` is the only status with
    /// outgoing transitions. Leaving `scheduled` releases the slot claim in
    /// the store, so a cancelled slot is immediately reservable again.
    pub async fn update_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError> {
        let current = self.get(appointment_id).await?;
        self.lifecycle.validate_transition(current.status, status)?;

        let updated = self
            .store
            .update_appointment_status(appointment_id, status)
            .await
            .map_err(|err| match err {
                StorageError::SlotTaken => SchedulingError::SlotConflict,
                other => other.into(),
            })?;

        info!("Appointment {} moved to {}", appointment_id, updated.status);
        Ok(updated)
    }
}
