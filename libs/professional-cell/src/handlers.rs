// libs/professional-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use shared_models::auth::User;
use shared_models::domain::{AvailabilityWindow, Professional, Specialty};
use shared_models::error::AppError;
use shared_storage::AppState;
use shared_utils::extractor::require_permission;

use crate::models::{
    CreateProfessionalRequest, CreateSpecialtyRequest, CreateWindowRequest, ProfessionalListQuery,
    UpdateWindowRequest,
};
use crate::services::professional::ProfessionalService;
use crate::services::specialty::SpecialtyService;
use crate::services::windows::WindowService;

#[axum::debug_handler]
pub async fn create_specialty(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateSpecialtyRequest>,
) -> Result<(StatusCode, Json<Specialty>), AppError> {
    require_permission(&user, "write:specialties")?;

    let service = SpecialtyService::new(&state);
    let specialty = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(specialty)))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Specialty>>, AppError> {
    require_permission(&user, "read:specialties")?;

    let service = SpecialtyService::new(&state);
    let specialties = service.list().await?;

    Ok(Json(specialties))
}

#[axum::debug_handler]
pub async fn create_professional(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateProfessionalRequest>,
) -> Result<(StatusCode, Json<Professional>), AppError> {
    require_permission(&user, "write:professionals")?;

    let service = ProfessionalService::new(&state);
    let professional = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(professional)))
}

#[axum::debug_handler]
pub async fn list_professionals(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ProfessionalListQuery>,
) -> Result<Json<Vec<Professional>>, AppError> {
    require_permission(&user, "read:professionals")?;

    let service = ProfessionalService::new(&state);
    let professionals = service.list(query.specialty_id).await?;

    Ok(Json(professionals))
}

#[axum::debug_handler]
pub async fn get_professional(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(professional_id): Path<i64>,
) -> Result<Json<Professional>, AppError> {
    require_permission(&user, "read:professionals")?;

    let service = ProfessionalService::new(&state);
    let professional = service.get(professional_id).await?;

    Ok(Json(professional))
}

#[axum::debug_handler]
pub async fn create_window(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(professional_id): Path<i64>,
    Json(request): Json<CreateWindowRequest>,
) -> Result<(StatusCode, Json<AvailabilityWindow>), AppError> {
    require_permission(&user, "write:windows")?;

    let service = WindowService::new(&state);
    let window = service.create(professional_id, request).await?;

    Ok((StatusCode::CREATED, Json(window)))
}

#[axum::debug_handler]
pub async fn list_windows(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(professional_id): Path<i64>,
) -> Result<Json<Vec<AvailabilityWindow>>, AppError> {
    require_permission(&user, "read:windows")?;

    let service = WindowService::new(&state);
    let windows = service.list_for_professional(professional_id).await?;

    Ok(Json(windows))
}

#[axum::debug_handler]
pub async fn get_window(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(window_id): Path<i64>,
) -> Result<Json<AvailabilityWindow>, AppError> {
    require_permission(&user, "read:windows")?;

    let service = WindowService::new(&state);
    let window = service.get(window_id).await?;

    Ok(Json(window))
}

#[axum::debug_handler]
pub async fn update_window(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(window_id): Path<i64>,
    Json(request): Json<UpdateWindowRequest>,
) -> Result<Json<AvailabilityWindow>, AppError> {
    require_permission(&user, "write:windows")?;

    let service = WindowService::new(&state);
    let window = service.update(window_id, request).await?;

    Ok(Json(window))
}

#[axum::debug_handler]
pub async fn delete_window(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(window_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_permission(&user, "write:windows")?;

    let service = WindowService::new(&state);
    service.delete(window_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
