// libs/professional-cell/src/services/specialty.rs
use std::sync::Arc;

use tracing::{debug, info};

use shared_models::domain::{NewSpecialty, Specialty};
use shared_storage::{AppState, ClinicStore, StorageError};

use crate::models::{CatalogError, CreateSpecialtyRequest};

pub struct SpecialtyService {
    store: Arc<dyn ClinicStore>,
}

impl SpecialtyService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create(&self, request: CreateSpecialtyRequest) -> Result<Specialty, CatalogError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput(
                "specialty name must not be empty".to_string(),
            ));
        }
        debug!("Creating specialty '{}'", name);

        let specialty = self
            .store
            .insert_specialty(NewSpecialty {
                name: name.clone(),
                description: request.description,
            })
            .await
            .map_err(|err| match err {
                StorageError::Duplicate(_) => CatalogError::SpecialtyExists(name.clone()),
                other => other.into(),
            })?;

        info!("Specialty {} ('{}') created", specialty.id, specialty.name);
        Ok(specialty)
    }

    pub async fn list(&self) -> Result<Vec<Specialty>, CatalogError> {
        Ok(self.store.list_specialties().await?)
    }
}
