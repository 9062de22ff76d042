use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Routes for issuing and inspecting service tokens. Issuance is public by
/// necessity; validation sits behind the bearer check like everything else.
pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/token", post(handlers::issue_service_token));

    let protected_routes = Router::new()
        .route("/validate", post(handlers::validate_token))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
