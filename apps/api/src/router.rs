use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::{availability_routes, doctor_routes};
use patient_cell::router::patient_routes;
use shared_database::Store;

pub fn create_router(store: Store) -> Router {
    Router::new()
        .route("/", get(|| async { "A1 Hospital Booking API is running!" }))
        .route("/health", get(health))
        .with_state(store.clone())
        .merge(availability_routes(store.clone()))
        .nest("/doctors", doctor_routes(store.clone()))
        .nest("/patients", patient_routes(store.clone()))
        .nest("/appointments", appointment_routes(store))
}

async fn health(State(store): State<Store>) -> Json<Value> {
    Json(json!({
        "ok": store.is_healthy().await,
        "time": Utc::now().to_rfc3339(),
    }))
}
