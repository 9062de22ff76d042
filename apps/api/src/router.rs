use axum::{routing::get, Json, Router};
use serde_json::json;

use auth_cell::router::auth_routes;
use checkin_cell::router::checkin_routes;
use patient_cell::router::patient_routes;
use professional_cell::router::professional_routes;
use scheduling_cell::router::scheduling_routes;
use shared_storage::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Atende Clinic API is running!" }))
        .route("/health", get(health))
        .nest("/auth", auth_routes(state.config.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/professionals", professional_routes(state.clone()))
        .nest("/schedule", scheduling_routes(state.clone()))
        .nest("/checkin", checkin_routes(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
