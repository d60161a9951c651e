// libs/appointment-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use shared_database::Store;

use crate::handlers;

pub fn appointment_routes(store: Store) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment).get(handlers::list_appointments))
        .route("/patient/{patient_id}", get(handlers::patient_appointments))
        .route("/by_id/{appointment_id}", get(handlers::get_appointment))
        .route("/reschedule", post(handlers::reschedule_appointment))
        .route("/cancel", post(handlers::cancel_appointment))
        .with_state(store)
}
