// libs/patient-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared_database::Store;
use shared_models::AppError;

use crate::models::{Patient, PatientLookupResponse, PatientSummary, RegisterPatientRequest};
use crate::services::patient::PatientService;

const DEFAULT_SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct PatientSearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PhoneLookupParams {
    pub phone: String,
}

pub async fn register_patient(
    State(store): State<Store>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&store);
    let patient = service.register_patient(request).await?;

    Ok(Json(patient))
}

pub async fn get_patient(
    State(store): State<Store>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&store);
    let patient = service.get_patient(patient_id).await?;

    Ok(Json(patient))
}

pub async fn search_patients(
    State(store): State<Store>,
    Query(params): Query<PatientSearchParams>,
) -> Result<Json<Vec<PatientSummary>>, AppError> {
    let service = PatientService::new(&store);
    let patients = service
        .search_patients(
            params.q.as_deref(),
            params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            params.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(patients))
}

pub async fn lookup_patient(
    State(store): State<Store>,
    Query(params): Query<PhoneLookupParams>,
) -> Result<Json<PatientLookupResponse>, AppError> {
    let service = PatientService::new(&store);
    let patient = service.lookup_by_phone(&params.phone).await?;

    Ok(Json(PatientLookupResponse::from(patient)))
}
