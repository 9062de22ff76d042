// libs/professional-cell/src/services/windows.rs
use std::sync::Arc;

use chrono::NaiveTime;
use regex::Regex;
use tracing::{debug, info};

use shared_models::domain::{AvailabilityWindow, NewAvailabilityWindow, WindowChanges};
use shared_storage::{AppState, ClinicStore};

use crate::models::{CatalogError, CreateWindowRequest, UpdateWindowRequest};

const MIN_SLOT_MINUTES: u32 = 10;
const MAX_SLOT_MINUTES: u32 = 120;
const DEFAULT_SLOT_MINUTES: u32 = 15;

pub struct WindowService {
    store: Arc<dyn ClinicStore>,
    time_pattern: Regex,
}

impl WindowService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            time_pattern: Regex::new(r"^\d{2}:\d{2}$").unwrap(),
        }
    }

    fn parse_time(&self, raw: &str) -> Result<NaiveTime, CatalogError> {
        if !self.time_pattern.is_match(raw) {
            return Err(CatalogError::InvalidInput(format!(
                "time must be HH:MM, got '{}'",
                raw
            )));
        }

        NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| CatalogError::InvalidInput(format!("'{}' is not a time of day", raw)))
    }

    /// The rules every stored window satisfies; enforced here so the slot
    /// generator downstream never sees a zero step or an inverted range.
    fn validate_shape(
        day_of_week: u8,
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: u32,
    ) -> Result<(), CatalogError> {
        if day_of_week > 6 {
            return Err(CatalogError::InvalidInput(format!(
                "day_of_week must be between 0 (Monday) and 6 (Sunday), got {}",
                day_of_week
            )));
        }
        if start_time >= end_time {
            return Err(CatalogError::InvalidInput(format!(
                "start_time {} must be before end_time {}",
                start_time.format("%H:%M"),
                end_time.format("%H:%M")
            )));
        }
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&slot_duration_minutes) {
            return Err(CatalogError::InvalidInput(format!(
                "slot_duration_minutes must be between {} and {}, got {}",
                MIN_SLOT_MINUTES, MAX_SLOT_MINUTES, slot_duration_minutes
            )));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        professional_id: i64,
        request: CreateWindowRequest,
    ) -> Result<AvailabilityWindow, CatalogError> {
        self.store
            .find_professional(professional_id)
            .await?
            .ok_or(CatalogError::ProfessionalNotFound)?;

        let start_time = self.parse_time(&request.start_time)?;
        let end_time = self.parse_time(&request.end_time)?;
        let slot_duration_minutes = request.slot_duration_minutes.unwrap_or(DEFAULT_SLOT_MINUTES);
        Self::validate_shape(
            request.day_of_week,
            start_time,
            end_time,
            slot_duration_minutes,
        )?;

        debug!(
            "Creating window for professional {} on weekday {}",
            professional_id, request.day_of_week
        );

        let window = self
            .store
            .insert_window(NewAvailabilityWindow {
                professional_id,
                day_of_week: request.day_of_week,
                start_time,
                end_time,
                slot_duration_minutes,
            })
            .await?;

        info!("Window {} created", window.id);
        Ok(window)
    }

    pub async fn list_for_professional(
        &self,
        professional_id: i64,
    ) -> Result<Vec<AvailabilityWindow>, CatalogError> {
        self.store
            .find_professional(professional_id)
            .await?
            .ok_or(CatalogError::ProfessionalNotFound)?;

        Ok(self.store.windows_for_professional(professional_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<AvailabilityWindow, CatalogError> {
        self.store
            .find_window(id)
            .await?
            .ok_or(CatalogError::WindowNotFound)
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateWindowRequest,
    ) -> Result<AvailabilityWindow, CatalogError> {
        let existing = self.get(id).await?;

        let start_time = match request.start_time.as_deref() {
            Some(raw) => Some(self.parse_time(raw)?),
            None => None,
        };
        let end_time = match request.end_time.as_deref() {
            Some(raw) => Some(self.parse_time(raw)?),
            None => None,
        };

        // Validate the window as it would look after the merge.
        Self::validate_shape(
            request.day_of_week.unwrap_or(existing.day_of_week),
            start_time.unwrap_or(existing.start_time),
            end_time.unwrap_or(existing.end_time),
            request
                .slot_duration_minutes
                .unwrap_or(existing.slot_duration_minutes),
        )?;

        let window = self
            .store
            .update_window(
                id,
                WindowChanges {
                    day_of_week: request.day_of_week,
                    start_time,
                    end_time,
                    slot_duration_minutes: request.slot_duration_minutes,
                },
            )
            .await?;

        info!("Window {} updated", window.id);
        Ok(window)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        self.store.delete_window(id).await?;
        info!("Window {} deleted", id);
        Ok(())
    }
}
