// libs/patient-cell/src/handlers.rs
use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::domain::Patient;
use shared_models::error::AppError;
use shared_storage::AppState;
use shared_utils::extractor::require_permission;

use crate::models::{CreatePatientRequest, PatientListQuery};
use crate::services::patient::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    require_permission(&user, "write:patients")?;

    let service = PatientService::new(&state);
    let patient = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Patient>, AppError> {
    require_permission(&user, "read:patients")?;

    let service = PatientService::new(&state);
    let patient = service.get(patient_id).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn get_patient_by_cpf(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(cpf): Path<String>,
) -> Result<Json<Patient>, AppError> {
    require_permission(&user, "read:patients")?;

    let service = PatientService::new(&state);
    let patient = service.get_by_cpf(&cpf).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<Patient>>, AppError> {
    require_permission(&user, "read:patients")?;

    let service = PatientService::new(&state);
    let patients = service
        .list(query.skip.unwrap_or(0), query.limit.unwrap_or(100))
        .await?;

    Ok(Json(patients))
}

/// Raw template bytes in the request body; any octet stream is accepted.
#[axum::debug_handler]
pub async fn upload_fingerprint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<i64>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    require_permission(&user, "write:patients")?;

    let service = PatientService::new(&state);
    let patient = service.enroll_fingerprint(patient_id, body.to_vec()).await?;

    Ok(Json(json!({
        "patient_id": patient.id,
        "fingerprint_enrolled": patient.fingerprint_enrolled,
    })))
}

#[axum::debug_handler]
pub async fn download_fingerprint(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_permission(&user, "read:patients")?;

    let service = PatientService::new(&state);
    let template = service.fingerprint(patient_id).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        template,
    ))
}
