// libs/patient-cell/src/router.rs
use axum::{
    routing::get,
    Router,
};

use shared_database::Store;

use crate::handlers;

pub fn patient_routes(store: Store) -> Router {
    Router::new()
        .route("/", get(handlers::search_patients).post(handlers::register_patient))
        .route("/lookup", get(handlers::lookup_patient))
        .route("/{patient_id}", get(handlers::get_patient))
        .with_state(store)
}
