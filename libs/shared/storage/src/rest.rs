use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::domain::{
    Appointment, AppointmentFilter, AppointmentStatus, AvailabilityWindow, NewAppointment,
    NewAvailabilityWindow, NewPatient, NewProfessional, NewSpecialty, Patient, Professional,
    Specialty, WindowChanges,
};

use crate::{ClinicStore, StorageError};

use base64::{engine::general_purpose::STANDARD, Engine};

/// PostgREST-style HTTP store. The backing `appointments` table carries a
/// partial unique index on `(professional_id, date, time_slot)` where
/// `status = 'scheduled'`; violating inserts and status flips come back as
/// HTTP 409, which is what makes the booking claim atomic on this backend.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

fn first_row<T>(rows: Vec<T>) -> Result<T, StorageError> {
    rows.into_iter().next().ok_or(StorageError::NotFound)
}

impl RestStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.storage_api_url.clone(),
            api_key: config.storage_api_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).unwrap(),
        );
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, StorageError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making storage request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Storage API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => {
                    StorageError::Unavailable(format!("storage rejected credentials: {}", error_text))
                }
                404 => StorageError::NotFound,
                409 => StorageError::Duplicate(error_text),
                _ => StorageError::Unavailable(format!("{}: {}", status, error_text)),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    async fn find_one<T>(&self, path: &str) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self.request(Method::GET, path, None).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl ClinicStore for RestStore {
    async fn insert_specialty(&self, new: NewSpecialty) -> Result<Specialty, StorageError> {
        let body = json!({
            "name": new.name,
            "description": new.description,
        });
        let rows: Vec<Specialty> = self.request(Method::POST, "/specialties", Some(body)).await?;
        first_row(rows)
    }

    async fn list_specialties(&self) -> Result<Vec<Specialty>, StorageError> {
        self.request(Method::GET, "/specialties?order=id.asc", None)
            .await
    }

    async fn find_specialty(&self, id: i64) -> Result<Option<Specialty>, StorageError> {
        self.find_one(&format!("/specialties?id=eq.{}", id)).await
    }

    async fn insert_professional(
        &self,
        new: NewProfessional,
    ) -> Result<Professional, StorageError> {
        let body = json!({
            "name": new.name,
            "license_number": new.license_number,
            "specialty_id": new.specialty_id,
        });
        let rows: Vec<Professional> = self
            .request(Method::POST, "/professionals", Some(body))
            .await?;
        first_row(rows)
    }

    async fn list_professionals(
        &self,
        specialty_id: Option<i64>,
    ) -> Result<Vec<Professional>, StorageError> {
        let path = match specialty_id {
            Some(id) => format!("/professionals?specialty_id=eq.{}&order=id.asc", id),
            None => "/professionals?order=id.asc".to_string(),
        };
        self.request(Method::GET, &path, None).await
    }

    async fn find_professional(&self, id: i64) -> Result<Option<Professional>, StorageError> {
        self.find_one(&format!("/professionals?id=eq.{}", id)).await
    }

    async fn insert_window(
        &self,
        new: NewAvailabilityWindow,
    ) -> Result<AvailabilityWindow, StorageError> {
        let body = json!({
            "professional_id": new.professional_id,
            "day_of_week": new.day_of_week,
            "start_time": new.start_time.format("%H:%M").to_string(),
            "end_time": new.end_time.format("%H:%M").to_string(),
            "slot_duration_minutes": new.slot_duration_minutes,
        });
        let rows: Vec<AvailabilityWindow> = self
            .request(Method::POST, "/availability_windows", Some(body))
            .await?;
        first_row(rows)
    }

    async fn find_window(&self, id: i64) -> Result<Option<AvailabilityWindow>, StorageError> {
        self.find_one(&format!("/availability_windows?id=eq.{}", id))
            .await
    }

    async fn update_window(
        &self,
        id: i64,
        changes: WindowChanges,
    ) -> Result<AvailabilityWindow, StorageError> {
        let mut body = serde_json::Map::new();
        if let Some(day_of_week) = changes.day_of_week {
            body.insert("day_of_week".to_string(), json!(day_of_week));
        }
        if let Some(start_time) = changes.start_time {
            body.insert(
                "start_time".to_string(),
                json!(start_time.format("%H:%M").to_string()),
            );
        }
        if let Some(end_time) = changes.end_time {
            body.insert(
                "end_time".to_string(),
                json!(end_time.format("%H:%M").to_string()),
            );
        }
        if let Some(duration) = changes.slot_duration_minutes {
            body.insert("slot_duration_minutes".to_string(), json!(duration));
        }
        let rows: Vec<AvailabilityWindow> = self
            .request(
                Method::PATCH,
                &format!("/availability_windows?id=eq.{}", id),
                Some(Value::Object(body)),
            )
            .await?;
        first_row(rows)
    }

    async fn delete_window(&self, id: i64) -> Result<(), StorageError> {
        let rows: Vec<AvailabilityWindow> = self
            .request(
                Method::DELETE,
                &format!("/availability_windows?id=eq.{}", id),
                None,
            )
            .await?;
        first_row(rows).map(|_| ())
    }

    async fn windows_for_professional(
        &self,
        professional_id: i64,
    ) -> Result<Vec<AvailabilityWindow>, StorageError> {
        let path = format!(
            "/availability_windows?professional_id=eq.{}&order=day_of_week.asc,start_time.asc",
            professional_id
        );
        self.request(Method::GET, &path, None).await
    }

    async fn windows_for_day(
        &self,
        professional_id: i64,
        day_of_week: u8,
    ) -> Result<Vec<AvailabilityWindow>, StorageError> {
        let path = format!(
            "/availability_windows?professional_id=eq.{}&day_of_week=eq.{}&order=start_time.asc",
            professional_id, day_of_week
        );
        self.request(Method::GET, &path, None).await
    }

    async fn insert_patient(&self, new: NewPatient) -> Result<Patient, StorageError> {
        let body = json!({
            "name": new.name,
            "cpf": new.cpf,
            "biometric_opt_in": new.biometric_opt_in,
            "fingerprint_enrolled": false,
        });
        let rows: Vec<Patient> = self.request(Method::POST, "/patients", Some(body)).await?;
        first_row(rows)
    }

    async fn list_patients(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Patient>, StorageError> {
        let path = format!("/patients?order=id.asc&offset={}&limit={}", offset, limit);
        self.request(Method::GET, &path, None).await
    }

    async fn find_patient(&self, id: i64) -> Result<Option<Patient>, StorageError> {
        self.find_one(&format!("/patients?id=eq.{}", id)).await
    }

    async fn find_patient_by_cpf(&self, cpf: &str) -> Result<Option<Patient>, StorageError> {
        self.find_one(&format!("/patients?cpf=eq.{}", cpf)).await
    }

    async fn store_fingerprint(
        &self,
        patient_id: i64,
        template: Vec<u8>,
    ) -> Result<Patient, StorageError> {
        let body = json!({
            "fingerprint_template": STANDARD.encode(&template),
            "fingerprint_enrolled": true,
        });
        let rows: Vec<Patient> = self
            .request(
                Method::PATCH,
                &format!("/patients?id=eq.{}", patient_id),
                Some(body),
            )
            .await?;
        first_row(rows)
    }

    async fn load_fingerprint(&self, patient_id: i64) -> Result<Option<Vec<u8>>, StorageError> {
        #[derive(serde::Deserialize)]
        struct FingerprintRow {
            fingerprint_template: Option<String>,
        }

        let path = format!(
            "/patients?id=eq.{}&select=fingerprint_template",
            patient_id
        );
        let rows: Vec<FingerprintRow> = self.request(Method::GET, &path, None).await?;
        let row = first_row(rows)?;
        match row.fingerprint_template {
            Some(encoded) => {
                let bytes = STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                    StorageError::Unavailable(format!("corrupt fingerprint encoding: {}", e))
                })?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }

    async fn insert_appointment(&self, new: NewAppointment) -> Result<Appointment, StorageError> {
        let body = json!({
            "patient_id": new.patient_id,
            "professional_id": new.professional_id,
            "date": new.date,
            "time_slot": new.time_slot.format("%H:%M").to_string(),
            "status": AppointmentStatus::Scheduled,
        });
        let rows: Vec<Appointment> = match self
            .request(Method::POST, "/appointments", Some(body))
            .await
        {
            Err(StorageError::Duplicate(_)) => return Err(StorageError::SlotTaken),
            other => other?,
        };
        first_row(rows)
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StorageError> {
        self.find_one(&format!("/appointments?id=eq.{}", id)).await
    }

    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, StorageError> {
        let mut params = Vec::new();
        if let Some(patient_id) = filter.patient_id {
            params.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(professional_id) = filter.professional_id {
            params.push(format!("professional_id=eq.{}", professional_id));
        }
        if let Some(date) = filter.date {
            params.push(format!("date=eq.{}", date.format("%Y-%m-%d")));
        }
        if let Some(status) = filter.status {
            params.push(format!("status=eq.{}", status));
        }
        params.push("order=date.asc,time_slot.asc".to_string());
        params.push(format!("offset={}&limit={}", filter.offset, filter.limit));
        let path = format!("/appointments?{}", params.join("&"));
        self.request(Method::GET, &path, None).await
    }

    async fn scheduled_for_day(
        &self,
        professional_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StorageError> {
        let path = format!(
            "/appointments?professional_id=eq.{}&date=eq.{}&status=eq.scheduled&order=time_slot.asc",
            professional_id,
            date.format("%Y-%m-%d")
        );
        self.request(Method::GET, &path, None).await
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StorageError> {
        let body = json!({ "status": status });
        let rows: Vec<Appointment> = match self
            .request(
                Method::PATCH,
                &format!("/appointments?id=eq.{}", id),
                Some(body),
            )
            .await
        {
            Err(StorageError::Duplicate(_)) => return Err(StorageError::SlotTaken),
            other => other?,
        };
        first_row(rows)
    }
}
