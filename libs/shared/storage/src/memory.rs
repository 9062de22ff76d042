use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Mutex;

use shared_models::domain::{
    Appointment, AppointmentFilter, AppointmentStatus, AvailabilityWindow, NewAppointment,
    NewAvailabilityWindow, NewPatient, NewProfessional, NewSpecialty, Patient, Professional,
    Specialty, WindowChanges,
};

use crate::{ClinicStore, StorageError};

#[derive(Default)]
struct IdGen {
    next: i64,
}

impl IdGen {
    fn take(&mut self) -> i64 {
        self.next += 1;
        self.next
    }
}

#[derive(Default)]
struct Inner {
    specialties: HashMap<i64, Specialty>,
    professionals: HashMap<i64, Professional>,
    windows: HashMap<i64, AvailabilityWindow>,
    patients: HashMap<i64, Patient>,
    fingerprints: HashMap<i64, Vec<u8>>,
    appointments: HashMap<i64, Appointment>,
    /// Live claims on `(professional_id, date, time_slot)`, one per
    /// `scheduled` appointment. Checked and updated under the same lock
    /// acquisition as the record mutation.
    claims: HashSet<(i64, NaiveDate, NaiveTime)>,
    specialty_ids: IdGen,
    professional_ids: IdGen,
    window_ids: IdGen,
    patient_ids: IdGen,
    appointment_ids: IdGen,
}

/// In-memory store used by tests and secret-less development bootstrap.
/// A single mutex serializes every mutation, which makes the booking
/// check-and-claim trivially atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn insert_specialty(&self, new: NewSpecialty) -> Result<Specialty, StorageError> {
        let mut inner = self.inner.lock().await;
        if inner.specialties.values().any(|s| s.name == new.name) {
            return Err(StorageError::Duplicate(format!(
                "specialty '{}' already exists",
                new.name
            )));
        }
        let id = inner.specialty_ids.take();
        let specialty = Specialty {
            id,
            name: new.name,
            description: new.description,
        };
        inner.specialties.insert(id, specialty.clone());
        Ok(specialty)
    }

    async fn list_specialties(&self) -> Result<Vec<Specialty>, StorageError> {
        let inner = self.inner.lock().await;
        let mut specialties: Vec<_> = inner.specialties.values().cloned().collect();
        specialties.sort_by_key(|s| s.id);
        Ok(specialties)
    }

    async fn find_specialty(&self, id: i64) -> Result<Option<Specialty>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.specialties.get(&id).cloned())
    }

    async fn insert_professional(
        &self,
        new: NewProfessional,
    ) -> Result<Professional, StorageError> {
        let mut inner = self.inner.lock().await;
        if inner
            .professionals
            .values()
            .any(|p| p.license_number == new.license_number)
        {
            return Err(StorageError::Duplicate(format!(
                "license number '{}' already registered",
                new.license_number
            )));
        }
        let id = inner.professional_ids.take();
        let professional = Professional {
            id,
            name: new.name,
            license_number: new.license_number,
            specialty_id: new.specialty_id,
        };
        inner.professionals.insert(id, professional.clone());
        Ok(professional)
    }

    async fn list_professionals(
        &self,
        specialty_id: Option<i64>,
    ) -> Result<Vec<Professional>, StorageError> {
        let inner = self.inner.lock().await;
        let mut professionals: Vec<_> = inner
            .professionals
            .values()
            .filter(|p| specialty_id.map_or(true, |s| p.specialty_id == s))
            .cloned()
            .collect();
        professionals.sort_by_key(|p| p.id);
        Ok(professionals)
    }

    async fn find_professional(&self, id: i64) -> Result<Option<Professional>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.professionals.get(&id).cloned())
    }

    async fn insert_window(
        &self,
        new: NewAvailabilityWindow,
    ) -> Result<AvailabilityWindow, StorageError> {
        let mut inner = self.inner.lock().await;
        let id = inner.window_ids.take();
        let window = AvailabilityWindow {
            id,
            professional_id: new.professional_id,
            day_of_week: new.day_of_week,
            start_time: new.start_time,
            end_time: new.end_time,
            slot_duration_minutes: new.slot_duration_minutes,
        };
        inner.windows.insert(id, window.clone());
        Ok(window)
    }

    async fn find_window(&self, id: i64) -> Result<Option<AvailabilityWindow>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.windows.get(&id).cloned())
    }

    async fn update_window(
        &self,
        id: i64,
        changes: WindowChanges,
    ) -> Result<AvailabilityWindow, StorageError> {
        let mut inner = self.inner.lock().await;
        let window = inner.windows.get_mut(&id).ok_or(StorageError::NotFound)?;
        if let Some(day_of_week) = changes.day_of_week {
            window.day_of_week = day_of_week;
        }
        if let Some(start_time) = changes.start_time {
            window.start_time = start_time;
        }
        if let Some(end_time) = changes.end_time {
            window.end_time = end_time;
        }
        if let Some(duration) = changes.slot_duration_minutes {
            window.slot_duration_minutes = duration;
        }
        Ok(window.clone())
    }

    async fn delete_window(&self, id: i64) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        inner.windows.remove(&id).ok_or(StorageError::NotFound)?;
        Ok(())
    }

    async fn windows_for_professional(
        &self,
        professional_id: i64,
    ) -> Result<Vec<AvailabilityWindow>, StorageError> {
        let inner = self.inner.lock().await;
        let mut windows: Vec<_> = inner
            .windows
            .values()
            .filter(|w| w.professional_id == professional_id)
            .cloned()
            .collect();
        windows.sort_by_key(|w| (w.day_of_week, w.start_time));
        Ok(windows)
    }

    async fn windows_for_day(
        &self,
        professional_id: i64,
        day_of_week: u8,
    ) -> Result<Vec<AvailabilityWindow>, StorageError> {
        let inner = self.inner.lock().await;
        let mut windows: Vec<_> = inner
            .windows
            .values()
            .filter(|w| w.professional_id == professional_id && w.day_of_week == day_of_week)
            .cloned()
            .collect();
        windows.sort_by_key(|w| w.start_time);
        Ok(windows)
    }

    async fn insert_patient(&self, new: NewPatient) -> Result<Patient, StorageError> {
        let mut inner = self.inner.lock().await;
        if inner.patients.values().any(|p| p.cpf == new.cpf) {
            return Err(StorageError::Duplicate(format!(
                "CPF '{}' already registered",
                new.cpf
            )));
        }
        let id = inner.patient_ids.take();
        let patient = Patient {
            id,
            name: new.name,
            cpf: new.cpf,
            biometric_opt_in: new.biometric_opt_in,
            fingerprint_enrolled: false,
        };
        inner.patients.insert(id, patient.clone());
        Ok(patient)
    }

    async fn list_patients(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Patient>, StorageError> {
        let inner = self.inner.lock().await;
        let mut patients: Vec<_> = inner.patients.values().cloned().collect();
        patients.sort_by_key(|p| p.id);
        Ok(patients.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_patient(&self, id: i64) -> Result<Option<Patient>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.patients.get(&id).cloned())
    }

    async fn find_patient_by_cpf(&self, cpf: &str) -> Result<Option<Patient>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.patients.values().find(|p| p.cpf == cpf).cloned())
    }

    async fn store_fingerprint(
        &self,
        patient_id: i64,
        template: Vec<u8>,
    ) -> Result<Patient, StorageError> {
        let mut inner = self.inner.lock().await;
        let patient = inner
            .patients
            .get_mut(&patient_id)
            .ok_or(StorageError::NotFound)?;
        patient.fingerprint_enrolled = true;
        let updated = patient.clone();
        inner.fingerprints.insert(patient_id, template);
        Ok(updated)
    }

    async fn load_fingerprint(&self, patient_id: i64) -> Result<Option<Vec<u8>>, StorageError> {
        let inner = self.inner.lock().await;
        if !inner.patients.contains_key(&patient_id) {
            return Err(StorageError::NotFound);
        }
        Ok(inner.fingerprints.get(&patient_id).cloned())
    }

    async fn insert_appointment(&self, new: NewAppointment) -> Result<Appointment, StorageError> {
        let mut inner = self.inner.lock().await;
        let key = (new.professional_id, new.date, new.time_slot);
        if !inner.claims.insert(key) {
            return Err(StorageError::SlotTaken);
        }
        let id = inner.appointment_ids.take();
        let appointment = Appointment {
            id,
            patient_id: new.patient_id,
            professional_id: new.professional_id,
            date: new.date,
            time_slot: new.time_slot,
            status: AppointmentStatus::Scheduled,
        };
        inner.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.appointments.get(&id).cloned())
    }

    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, StorageError> {
        let inner = self.inner.lock().await;
        let mut appointments: Vec<_> = inner
            .appointments
            .values()
            .filter(|a| filter.patient_id.map_or(true, |p| a.patient_id == p))
            .filter(|a| filter.professional_id.map_or(true, |p| a.professional_id == p))
            .filter(|a| filter.date.map_or(true, |d| a.date == d))
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        appointments.sort_by_key(|a| (a.date, a.time_slot, a.id));
        Ok(appointments
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn scheduled_for_day(
        &self,
        professional_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StorageError> {
        let inner = self.inner.lock().await;
        let mut appointments: Vec<_> = inner
            .appointments
            .values()
            .filter(|a| {
                a.professional_id == professional_id
                    && a.date == date
                    && a.status == AppointmentStatus::Scheduled
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.time_slot);
        Ok(appointments)
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StorageError> {
        let mut inner = self.inner.lock().await;
        let current = inner
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)?;
        if current.status == status {
            return Ok(current);
        }
        let key = (current.professional_id, current.date, current.time_slot);
        if current.status == AppointmentStatus::Scheduled {
            inner.claims.remove(&key);
        } else if status == AppointmentStatus::Scheduled && !inner.claims.insert(key) {
            return Err(StorageError::SlotTaken);
        }
        let appointment = inner
            .appointments
            .get_mut(&id)
            .ok_or(StorageError::NotFound)?;
        appointment.status = status;
        Ok(appointment.clone())
    }
}
