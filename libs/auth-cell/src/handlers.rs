use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::auth::{AccessTokenResponse, TokenRequest, TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;

use crate::services::authenticate;

/// POST /token, the one route in the API that takes no bearer. Exchanges a
/// configured service credential for a signed token.
#[axum::debug_handler]
pub async fn issue_service_token(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    debug!("Token requested for '{}'", request.username);

    let identity = match authenticate(&config, &request.username, &request.password) {
        Some(identity) => identity,
        None => {
            // Same answer for unknown usernames and wrong passwords.
            warn!("Rejected credentials for '{}'", request.username);
            return Err(AppError::Auth("Invalid username or password".to_string()));
        }
    };

    let token = issue_token(
        &identity.username,
        &identity.role,
        &identity.permissions,
        &config.jwt_secret,
        config.token_ttl_hours,
    )
    .map_err(AppError::Internal)?;

    info!(
        "Issued '{}' token for '{}' (ttl {}h)",
        identity.role, identity.username, config.token_ttl_hours
    );

    Ok(Json(AccessTokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        expires_in: config.token_ttl_hours * 3600,
    }))
}

/// POST /validate. The middleware has already checked the signature, so this
/// just echoes what the token says about the caller.
#[axum::debug_handler]
pub async fn validate_token(
    Extension(user): Extension<User>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Echoing validated identity '{}'", user.id);

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        role: user.role,
        permissions: user.permissions,
    }))
}
