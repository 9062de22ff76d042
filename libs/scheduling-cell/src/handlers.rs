// libs/scheduling-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use patient_cell::services::patient::PatientService;
use shared_models::auth::User;
use shared_models::domain::{Appointment, AppointmentFilter};
use shared_models::error::AppError;
use shared_storage::AppState;
use shared_utils::extractor::require_permission;

use crate::models::{
    AppointmentQueryParams, ReserveAppointmentRequest, SlotAvailability, UpdateStatusRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;

/// Free/busy list for one professional on one date. The list is a
/// snapshot; a slot shown free can still be lost to a concurrent booking,
/// in which case the reservation returns 409 and the caller re-queries.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((professional_id, date)): Path<(i64, String)>,
) -> Result<Json<Vec<SlotAvailability>>, AppError> {
    require_permission(&user, "read:appointments")?;

    let service = AvailabilityService::new(&state);
    let slots = service.free_slots(professional_id, &date).await?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn reserve_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<ReserveAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_permission(&user, "write:appointments")?;

    // Resolve the patient reference before touching the booking engine.
    let registry = PatientService::new(&state);
    let patient_id = match request.patient_id {
        Some(id) => registry.get(id).await?.id,
        None => match (request.cpf.as_deref(), request.name.as_deref()) {
            (Some(cpf), Some(name)) => registry.resolve(cpf, name).await?.id,
            _ => {
                return Err(AppError::BadRequest(
                    "Provide patient_id, or cpf and name together".to_string(),
                ))
            }
        },
    };

    let service = BookingService::new(&state);
    let appointment = service
        .reserve(
            request.professional_id,
            patient_id,
            &request.date,
            &request.time_slot,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "appointment_id": appointment.id,
            "professional_id": appointment.professional_id,
            "patient_id": appointment.patient_id,
            "date": appointment.date,
            "time_slot": appointment.time_slot.format("%H:%M").to_string(),
            "status": appointment.status,
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    require_permission(&user, "read:appointments")?;

    let service = BookingService::new(&state);
    let appointment = service.get(appointment_id).await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(params): Query<AppointmentQueryParams>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    require_permission(&user, "read:appointments")?;

    let date = match params.date.as_deref() {
        Some(raw) => Some(raw.parse::<NaiveDate>().map_err(|_| {
            AppError::BadRequest(format!("Invalid date filter: '{}'", raw))
        })?),
        None => None,
    };

    let filter = AppointmentFilter {
        patient_id: params.patient_id,
        professional_id: params.professional_id,
        date,
        status: params.status,
        offset: params.skip.unwrap_or(0),
        limit: params.limit.unwrap_or(100).min(500),
    };

    let service = BookingService::new(&state);
    let appointments = service.list(filter).await?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    require_permission(&user, "update:appointment_status")?;

    let service = BookingService::new(&state);
    let appointment = service.update_status(appointment_id, request.status).await?;

    Ok(Json(json!({
        "appointment_id": appointment.id,
        "status": appointment.status,
    })))
}
