use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use tower::ServiceExt;

use checkin_cell::router::checkin_routes;
use shared_models::domain::NewAppointment;
use shared_storage::{AppState, ClinicStore};
use shared_utils::test_utils::{
    seed_patient, seed_professional, seed_specialty, test_app_state, JwtTestUtils, TestUser,
};

async fn seeded_state() -> (AppState, i64) {
    let state = test_app_state();
    let store = state.store.as_ref();

    let specialty = seed_specialty(store, "Cardiologia").await;
    let professional =
        seed_professional(store, "Dra. Helena Prado", "CRM-11223", specialty.id).await;
    let patient = seed_patient(store, "Carlos Eduardo Lima", "32165498701").await;
    let appointment = store
        .insert_appointment(NewAppointment {
            patient_id: patient.id,
            professional_id: professional.id,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            time_slot: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        })
        .await
        .expect("seed appointment");

    (state, appointment.id)
}

fn app(state: &AppState) -> Router {
    checkin_routes(state.clone())
}

fn bearer(state: &AppState, user: &TestUser) -> String {
    let token = JwtTestUtils::create_test_token(user, &state.config.jwt_secret, Some(24));
    format!("Bearer {}", token)
}

fn get_request(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_mint_requires_auth() {
    let (state, appointment_id) = seeded_state().await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/token/{}", appointment_id))
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mint_returns_qr_image_and_payload() {
    let (state, appointment_id) = seeded_state().await;
    let auth = bearer(&state, &TestUser::bot());

    let uri = format!("/token/{}", appointment_id);
    let response = app(&state).oneshot(get_request(&uri, &auth)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["appointment_id"].as_i64(), Some(appointment_id));

    let png = STANDARD
        .decode(body["qr_code"].as_str().unwrap())
        .expect("qr_code must be valid base64");
    assert_eq!(&png[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    let payload = &body["payload"];
    assert_eq!(payload["cmd"], "checkin");
    assert_eq!(payload["appt_id"].as_i64(), Some(appointment_id));
    assert_eq!(payload["cpf"], "32165498701");
    assert_eq!(payload["name"], "Carlos Eduardo Lima");
    assert_eq!(payload["hash"].as_str().unwrap().len(), 16);
}

#[tokio::test]
async fn test_mint_unknown_appointment_is_404() {
    let (state, _) = seeded_state().await;
    let auth = bearer(&state, &TestUser::bot());

    let response = app(&state)
        .oneshot(get_request("/token/777777", &auth))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

// The check-in terminal itself fetches tokens when re-printing a lost code.
#[tokio::test]
async fn test_device_identity_can_mint() {
    let (state, appointment_id) = seeded_state().await;
    let auth = bearer(&state, &TestUser::device());

    let uri = format!("/token/{}", appointment_id);
    let response = app(&state).oneshot(get_request(&uri, &auth)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_identity_without_permission_is_403() {
    let (state, appointment_id) = seeded_state().await;
    let auth = bearer(
        &state,
        &TestUser::new("lobby-display", "display", &["read:professionals"]),
    );

    let uri = format!("/token/{}", appointment_id);
    let response = app(&state).oneshot(get_request(&uri, &auth)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
