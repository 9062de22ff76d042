use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Serde adapter for time-of-day fields that cross the wire as `"HH:MM"`.
/// Deserialization also accepts `"HH:MM:SS"` because the REST storage
/// backend returns `time` columns with seconds.
pub mod time_slot_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&value, FORMAT))
            .map_err(serde::de::Error::custom)
    }
}

/// Day-of-week index used by availability windows: 0 = Monday .. 6 = Sunday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpecialty {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: i64,
    pub name: String,
    pub license_number: String,
    pub specialty_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfessional {
    pub name: String,
    pub license_number: String,
    pub specialty_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub biometric_opt_in: bool,
    pub fingerprint_enrolled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub cpf: String,
    pub biometric_opt_in: bool,
}

/// One recurring weekly open-hours interval for a professional. A
/// professional may hold several windows on the same day; the slot engine
/// unions them without assuming disjointness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: i64,
    pub professional_id: i64,
    pub day_of_week: u8,
    #[serde(with = "time_slot_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_slot_format")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAvailabilityWindow {
    pub professional_id: i64,
    pub day_of_week: u8,
    #[serde(with = "time_slot_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_slot_format")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowChanges {
    pub day_of_week: Option<u8>,
    #[serde(default, with = "optional_time_slot_format")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "optional_time_slot_format")]
    pub end_time: Option<NaiveTime>,
    pub slot_duration_minutes: Option<u32>,
}

mod optional_time_slot_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => super::time_slot_format::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            Some(s) => NaiveTime::parse_from_str(&s, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub professional_id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_slot_format")]
    pub time_slot: NaiveTime,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub professional_id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_slot_format")]
    pub time_slot: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct AppointmentFilter {
    pub patient_id: Option<i64>,
    pub professional_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for AppointmentFilter {
    fn default() -> Self {
        Self {
            patient_id: None,
            professional_id: None,
            date: None,
            status: None,
            offset: 0,
            limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(AppointmentStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_time_slot_serializes_without_seconds() {
        let window = AvailabilityWindow {
            id: 1,
            professional_id: 1,
            day_of_week: 0,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            slot_duration_minutes: 30,
        };
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["start_time"], "08:00");
        assert_eq!(json["end_time"], "12:00");
    }

    #[test]
    fn test_time_slot_accepts_storage_seconds() {
        let json = serde_json::json!({
            "id": 7,
            "professional_id": 1,
            "day_of_week": 2,
            "start_time": "09:00:00",
            "end_time": "11:30:00",
            "slot_duration_minutes": 15
        });
        let window: AvailabilityWindow = serde_json::from_value(json).unwrap();
        assert_eq!(window.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(window.end_time, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
    }

    #[test]
    fn test_weekday_index_starts_at_monday() {
        // 2025-06-02 was a Monday.
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(weekday_index(monday), 0);
        assert_eq!(weekday_index(monday + chrono::Duration::days(6)), 6);
    }
}
