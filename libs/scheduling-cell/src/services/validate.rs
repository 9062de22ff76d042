// libs/scheduling-cell/src/services/validate.rs
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::models::SchedulingError;

/// Syntactic gate for booking inputs. The regexes reject anything not
/// shaped like `YYYY-MM-DD` / `HH:MM` before chrono checks that the value
/// exists on a calendar.
pub struct SlotSyntax {
    date_pattern: Regex,
    time_pattern: Regex,
}

impl SlotSyntax {
    pub fn new() -> Self {
        Self {
            date_pattern: Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
            time_pattern: Regex::new(r"^\d{2}:\d{2}$").unwrap(),
        }
    }

    pub fn parse_date(&self, raw: &str) -> Result<NaiveDate, SchedulingError> {
        if !self.date_pattern.is_match(raw) {
            return Err(SchedulingError::InvalidInput(format!(
                "date must be YYYY-MM-DD, got '{}'",
                raw
            )));
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            SchedulingError::InvalidInput(format!("'{}' is not a calendar date", raw))
        })
    }

    pub fn parse_time(&self, raw: &str) -> Result<NaiveTime, SchedulingError> {
        if !self.time_pattern.is_match(raw) {
            return Err(SchedulingError::InvalidInput(format!(
                "time slot must be HH:MM, got '{}'",
                raw
            )));
        }

        NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
            SchedulingError::InvalidInput(format!("'{}' is not a time of day", raw))
        })
    }
}
