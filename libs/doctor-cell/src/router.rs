// libs/doctor-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use shared_database::Store;

use crate::handlers;

pub fn doctor_routes(store: Store) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .with_state(store)
}

pub fn availability_routes(store: Store) -> Router {
    Router::new()
        .route("/availability", post(handlers::department_availability))
        .with_state(store)
}
