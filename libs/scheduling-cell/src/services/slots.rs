// libs/scheduling-cell/src/services/slots.rs
use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};

use shared_models::domain::AvailabilityWindow;

/// Expands recurring availability windows into discrete bookable start
/// times. Pure computation; no storage access.
pub struct SlotGenerator;

impl SlotGenerator {
    pub fn new() -> Self {
        Self
    }

    /// All slot start times for one window, ascending, strictly half-open:
    /// a slot is emitted only when it fits entirely inside
    /// `[start_time, end_time)`, so a trailing partial slot is dropped. A
    /// window shorter than one duration yields an empty list, not an error.
    pub fn generate(&self, window: &AvailabilityWindow) -> Vec<NaiveTime> {
        // A zero step would never advance the cursor; non-positive durations
        // are rejected at window creation.
        if window.slot_duration_minutes == 0 {
            return Vec::new();
        }

        let step = Duration::minutes(window.slot_duration_minutes as i64);
        let mut slots = Vec::new();
        let mut cursor = window.start_time;

        loop {
            let (slot_end, wrapped) = cursor.overflowing_add_signed(step);
            if wrapped != 0 || slot_end > window.end_time {
                break;
            }
            slots.push(cursor);
            cursor = slot_end;
        }

        slots
    }

    /// Union of `generate` across windows, deduplicated and ordered.
    /// Overlapping windows collapse to a single entry per start time; the
    /// engine does not assume windows are disjoint.
    pub fn offered_slots(&self, windows: &[AvailabilityWindow]) -> BTreeSet<NaiveTime> {
        let mut slots = BTreeSet::new();
        for window in windows {
            slots.extend(self.generate(window));
        }
        slots
    }
}
