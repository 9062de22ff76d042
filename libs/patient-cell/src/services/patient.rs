// libs/patient-cell/src/services/patient.rs
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info};

use shared_models::domain::{NewPatient, Patient};
use shared_storage::{AppState, ClinicStore, StorageError};

use crate::models::{CreatePatientRequest, PatientError};

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 200;

pub struct PatientService {
    store: Arc<dyn ClinicStore>,
    cpf_pattern: Regex,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            cpf_pattern: Regex::new(r"^\d{11}$").unwrap(),
        }
    }

    fn validate_identity(&self, cpf: &str, name: &str) -> Result<(), PatientError> {
        if !self.cpf_pattern.is_match(cpf) {
            return Err(PatientError::InvalidCpf(cpf.to_string()));
        }

        let chars = name.trim().chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
            return Err(PatientError::InvalidName(format!(
                "name must have between {} and {} characters",
                NAME_MIN_CHARS, NAME_MAX_CHARS
            )));
        }

        Ok(())
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        self.validate_identity(&request.cpf, &request.name)?;
        debug!("Creating patient record for CPF ending {}", &request.cpf[7..]);

        let patient = self
            .store
            .insert_patient(NewPatient {
                name: request.name.trim().to_string(),
                cpf: request.cpf.clone(),
                biometric_opt_in: request.biometric_opt_in,
            })
            .await
            .map_err(|err| match err {
                StorageError::Duplicate(_) => PatientError::CpfAlreadyExists(request.cpf.clone()),
                other => other.into(),
            })?;

        info!("Patient {} registered", patient.id);
        Ok(patient)
    }

    pub async fn get(&self, id: i64) -> Result<Patient, PatientError> {
        self.store
            .find_patient(id)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn get_by_cpf(&self, cpf: &str) -> Result<Patient, PatientError> {
        if !self.cpf_pattern.is_match(cpf) {
            return Err(PatientError::InvalidCpf(cpf.to_string()));
        }

        self.store
            .find_patient_by_cpf(cpf)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Patient>, PatientError> {
        Ok(self.store.list_patients(skip, limit.min(500)).await?)
    }

    /// Find-or-create by CPF. The booking flow calls this so a first-time
    /// caller can reserve a slot without a prior registration step; the
    /// stored name is never overwritten for an existing CPF.
    pub async fn resolve(&self, cpf: &str, name: &str) -> Result<Patient, PatientError> {
        self.validate_identity(cpf, name)?;

        if let Some(existing) = self.store.find_patient_by_cpf(cpf).await? {
            return Ok(existing);
        }

        let inserted = self
            .store
            .insert_patient(NewPatient {
                name: name.trim().to_string(),
                cpf: cpf.to_string(),
                biometric_opt_in: false,
            })
            .await;

        match inserted {
            Ok(patient) => {
                info!("Patient {} registered during booking", patient.id);
                Ok(patient)
            }
            // Lost a create race; the record exists now.
            Err(StorageError::Duplicate(_)) => self.get_by_cpf(cpf).await,
            Err(other) => Err(other.into()),
        }
    }

    pub async fn enroll_fingerprint(
        &self,
        id: i64,
        template: Vec<u8>,
    ) -> Result<Patient, PatientError> {
        if template.is_empty() {
            return Err(PatientError::EmptyTemplate);
        }

        let patient = self.store.store_fingerprint(id, template).await?;
        info!("Fingerprint template stored for patient {}", patient.id);
        Ok(patient)
    }

    pub async fn fingerprint(&self, id: i64) -> Result<Vec<u8>, PatientError> {
        self.store
            .load_fingerprint(id)
            .await?
            .ok_or(PatientError::FingerprintMissing)
    }
}
