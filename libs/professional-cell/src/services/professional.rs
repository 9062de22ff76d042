// libs/professional-cell/src/services/professional.rs
use std::sync::Arc;

use tracing::{debug, info};

use shared_models::domain::{NewProfessional, Professional};
use shared_storage::{AppState, ClinicStore, StorageError};

use crate::models::{CatalogError, CreateProfessionalRequest};

pub struct ProfessionalService {
    store: Arc<dyn ClinicStore>,
}

impl ProfessionalService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateProfessionalRequest,
    ) -> Result<Professional, CatalogError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput(
                "professional name must not be empty".to_string(),
            ));
        }
        if request.license_number.trim().is_empty() {
            return Err(CatalogError::InvalidInput(
                "license number must not be empty".to_string(),
            ));
        }

        self.store
            .find_specialty(request.specialty_id)
            .await?
            .ok_or(CatalogError::SpecialtyNotFound)?;

        debug!(
            "Creating professional '{}' in specialty {}",
            name, request.specialty_id
        );

        let professional = self
            .store
            .insert_professional(NewProfessional {
                name,
                license_number: request.license_number.trim().to_string(),
                specialty_id: request.specialty_id,
            })
            .await
            .map_err(|err| match err {
                StorageError::Duplicate(_) => {
                    CatalogError::LicenseExists(request.license_number.trim().to_string())
                }
                other => other.into(),
            })?;

        info!("Professional {} registered", professional.id);
        Ok(professional)
    }

    pub async fn list(&self, specialty_id: Option<i64>) -> Result<Vec<Professional>, CatalogError> {
        Ok(self.store.list_professionals(specialty_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Professional, CatalogError> {
        self.store
            .find_professional(id)
            .await?
            .ok_or(CatalogError::ProfessionalNotFound)
    }
}
