// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared_database::Store;
use shared_models::AppError;

use crate::models::{
    AppointmentResponse, AppointmentSearchQuery, BookAppointmentRequest,
    CancelAppointmentRequest, CancelAppointmentResponse, PatientAppointmentResponse,
    RescheduleAppointmentRequest,
};
use crate::services::booking::{schedule_date, AppointmentBookingService};
use crate::services::lifecycle::AppointmentLifecycleService;

const DEFAULT_LIST_LIMIT: i64 = 100;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentQueryParams {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub date: Option<String>,
    pub limit: Option<i64>,
}

// ==============================================================================
// HANDLERS
// ==============================================================================

pub async fn book_appointment(
    State(store): State<Store>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let service = AppointmentBookingService::new(&store);
    let appointment = service.book_appointment(request).await?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

pub async fn list_appointments(
    State(store): State<Store>,
    Query(params): Query<AppointmentQueryParams>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let date = match &params.date {
        Some(raw) => Some(schedule_date(raw)?),
        None => None,
    };
    let filter = AppointmentSearchQuery {
        patient_id: params.patient_id,
        doctor_id: params.doctor_id,
        date,
        limit: params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
    };

    let service = AppointmentBookingService::new(&store);
    let appointments = service.search_appointments(filter).await?;

    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

pub async fn patient_appointments(
    State(store): State<Store>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Vec<PatientAppointmentResponse>>, AppError> {
    let service = AppointmentBookingService::new(&store);
    let rows = service.patient_appointments(patient_id).await?;

    Ok(Json(
        rows.into_iter().map(PatientAppointmentResponse::from).collect(),
    ))
}

pub async fn get_appointment(
    State(store): State<Store>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let service = AppointmentBookingService::new(&store);
    let appointment = service.get_appointment(appointment_id).await?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

pub async fn reschedule_appointment(
    State(store): State<Store>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let service = AppointmentLifecycleService::new(&store);
    let appointment = service.reschedule_appointment(request).await?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

pub async fn cancel_appointment(
    State(store): State<Store>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<CancelAppointmentResponse>, AppError> {
    let service = AppointmentLifecycleService::new(&store);
    let appointment = service.cancel_appointment(request).await?;

    Ok(Json(CancelAppointmentResponse {
        ok: true,
        appointment_id: appointment.id,
        appointment_code: appointment.code(),
        status: appointment.status,
    }))
}
