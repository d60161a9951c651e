// libs/doctor-cell/src/handlers.rs
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared_database::Store;
use shared_models::AppError;

use crate::models::{AvailabilityQueryRequest, AvailabilityResponse, DoctorSummary};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;

#[derive(Debug, Deserialize)]
pub struct DoctorQueryParams {
    pub department: Option<String>,
}

pub async fn list_doctors(
    State(store): State<Store>,
    Query(params): Query<DoctorQueryParams>,
) -> Result<Json<Vec<DoctorSummary>>, AppError> {
    let service = DoctorService::new(&store);
    let doctors = service.list_doctors(params.department.as_deref()).await?;

    Ok(Json(doctors.into_iter().map(DoctorSummary::from).collect()))
}

pub async fn department_availability(
    State(store): State<Store>,
    Json(request): Json<AvailabilityQueryRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let service = AvailabilityService::new(&store);
    let response = service.department_availability(request).await?;

    Ok(Json(response))
}
