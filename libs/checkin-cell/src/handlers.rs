// libs/checkin-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_storage::AppState;
use shared_utils::extractor::require_permission;

use crate::services::token::CheckinTokenService;

/// Mints the check-in token for an appointment. The PNG travels as base64
/// for direct embedding in a chat or web client; the payload rides along
/// for operator logs.
#[axum::debug_handler]
pub async fn mint_checkin_token(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    require_permission(&user, "read:appointments")?;

    let service = CheckinTokenService::new(&state);
    let token = service.mint_for_appointment(appointment_id).await?;

    Ok(Json(json!({
        "appointment_id": appointment_id,
        "qr_code": STANDARD.encode(&token.png),
        "payload": token.payload,
    })))
}
