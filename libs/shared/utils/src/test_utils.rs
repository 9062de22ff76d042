use std::sync::Arc;

use chrono::{NaiveTime, Utc};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::domain::{
    AvailabilityWindow, NewAvailabilityWindow, NewPatient, NewProfessional, NewSpecialty, Patient,
    Professional, Specialty,
};
use shared_storage::{AppState, ClinicStore, MemoryStore};

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub checkin_secret: String,
    pub storage_api_url: String,
    pub storage_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            checkin_secret: "unit-test-checkin-secret".to_string(),
            storage_api_url: "http://localhost:54321".to_string(),
            storage_api_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            storage_api_url: self.storage_api_url.clone(),
            storage_api_key: self.storage_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            checkin_secret: self.checkin_secret.clone(),
            admin_username: "admin".to_string(),
            admin_password: "admin-pass".to_string(),
            bot_username: "bot".to_string(),
            bot_password: "bot-pass".to_string(),
            device_username: "device".to_string(),
            device_password: "device-pass".to_string(),
            token_ttl_hours: 720,
            api_port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// App state over a fresh in-memory store, the starting point of most cell
/// tests.
pub fn test_app_state() -> AppState {
    AppState::new(TestConfig::default().to_arc(), Arc::new(MemoryStore::new()))
}

pub struct TestUser {
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl TestUser {
    pub fn new(username: &str, role: &str, permissions: &[&str]) -> Self {
        Self {
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new("admin", "admin", &["*"])
    }

    /// The scheduling bot: reads the catalog, writes patients and
    /// appointments.
    pub fn bot() -> Self {
        Self::new(
            "bot",
            "bot",
            &[
                "read:specialties",
                "read:professionals",
                "read:windows",
                "read:patients",
                "write:patients",
                "read:appointments",
                "write:appointments",
            ],
        )
    }

    /// The front-desk check-in device: reads appointments, flips status.
    pub fn device() -> Self {
        Self::new(
            "device",
            "device",
            &["read:appointments", "update:appointment_status"],
        )
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.username.clone(),
            role: Some(self.role.clone()),
            permissions: self.permissions.clone(),
            issued_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        issue_token(
            &user.username,
            &user.role,
            &user.permissions,
            secret,
            exp_hours.unwrap_or(24),
        )
        .expect("test token signing")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

fn hm(value: (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(value.0, value.1, 0).expect("valid test time")
}

pub async fn seed_specialty(store: &dyn ClinicStore, name: &str) -> Specialty {
    store
        .insert_specialty(NewSpecialty {
            name: name.to_string(),
            description: None,
        })
        .await
        .expect("seed specialty")
}

pub async fn seed_professional(
    store: &dyn ClinicStore,
    name: &str,
    license_number: &str,
    specialty_id: i64,
) -> Professional {
    store
        .insert_professional(NewProfessional {
            name: name.to_string(),
            license_number: license_number.to_string(),
            specialty_id,
        })
        .await
        .expect("seed professional")
}

pub async fn seed_window(
    store: &dyn ClinicStore,
    professional_id: i64,
    day_of_week: u8,
    start: (u32, u32),
    end: (u32, u32),
    slot_duration_minutes: u32,
) -> AvailabilityWindow {
    store
        .insert_window(NewAvailabilityWindow {
            professional_id,
            day_of_week,
            start_time: hm(start),
            end_time: hm(end),
            slot_duration_minutes,
        })
        .await
        .expect("seed window")
}

pub async fn seed_patient(store: &dyn ClinicStore, name: &str, cpf: &str) -> Patient {
    store
        .insert_patient(NewPatient {
            name: name.to_string(),
            cpf: cpf.to_string(),
            biometric_opt_in: false,
        })
        .await
        .expect("seed patient")
}
