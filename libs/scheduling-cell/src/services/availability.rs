// libs/scheduling-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveTime;
use tracing::debug;

use shared_models::domain::weekday_index;
use shared_storage::{AppState, ClinicStore};

use crate::models::{SchedulingError, SlotAvailability};
use crate::services::slots::SlotGenerator;
use crate::services::validate::SlotSyntax;

pub struct AvailabilityService {
    store: Arc<dyn ClinicStore>,
    generator: SlotGenerator,
    syntax: SlotSyntax,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            generator: SlotGenerator::new(),
            syntax: SlotSyntax::new(),
        }
    }

    /// Free/busy list for one professional on one calendar date. A day
    /// without windows resolves to an empty list, not an error. The result
    /// is a snapshot: a slot reported free here can still lose the race
    /// inside `reserve`, which re-checks authoritatively.
    pub async fn free_slots(
        &self,
        professional_id: i64,
        date_str: &str,
    ) -> Result<Vec<SlotAvailability>, SchedulingError> {
        debug!(
            "Resolving free slots for professional {} on {}",
            professional_id, date_str
        );

        self.store
            .find_professional(professional_id)
            .await?
            .ok_or(SchedulingError::ProfessionalNotFound)?;

        let date = self.syntax.parse_date(date_str)?;
        let day_of_week = weekday_index(date);

        let windows = self
            .store
            .windows_for_day(professional_id, day_of_week)
            .await?;
        if windows.is_empty() {
            debug!(
                "Professional {} has no windows on weekday {}",
                professional_id, day_of_week
            );
            return Ok(Vec::new());
        }

        // Only scheduled appointments occupy a slot; cancelled and
        // completed ones never do.
        let occupied: HashSet<NaiveTime> = self
            .store
            .scheduled_for_day(professional_id, date)
            .await?
            .into_iter()
            .map(|appointment| appointment.time_slot)
            .collect();

        let slots = self
            .generator
            .offered_slots(&windows)
            .into_iter()
            .map(|time_slot| SlotAvailability {
                time_slot,
                is_free: !occupied.contains(&time_slot),
            })
            .collect();

        Ok(slots)
    }
}
