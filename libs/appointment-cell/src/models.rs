use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::services::schedule::{self, ScheduleError};
use shared_models::AppError;

pub(crate) const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, doctor_id, appt_date, appt_time, token_no, status, payment_method, created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Direct,
    Insurance,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appt_date: NaiveDate,
    pub appt_time: NaiveTime,
    pub token_no: i64,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Human-readable code derived from the numeric id, e.g. "APPT-000123".
    pub fn code(&self) -> String {
        format!("APPT-{:06}", self.id)
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub appointment_id: i64,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub new_doctor_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelAppointmentRequest {
    pub appointment_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentSearchQuery {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub limit: i64,
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: i64,
    pub appointment_code: String,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    pub token_no: i64,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            appointment_code: appointment.code(),
            id: appointment.id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            date: appointment.appt_date.to_string(),
            time: schedule::format_time(appointment.appt_time),
            token_no: appointment.token_no,
            status: appointment.status,
            payment_method: appointment.payment_method,
        }
    }
}

/// Appointment row joined with its doctor, for per-patient listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PatientAppointmentRow {
    pub id: i64,
    pub doctor_name: String,
    pub department: String,
    pub appt_date: NaiveDate,
    pub appt_time: NaiveTime,
    pub token_no: i64,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientAppointmentResponse {
    pub id: i64,
    pub appointment_code: String,
    pub doctor: String,
    pub department: String,
    pub date: String,
    pub time: String,
    pub token_no: i64,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
}

impl From<PatientAppointmentRow> for PatientAppointmentResponse {
    fn from(row: PatientAppointmentRow) -> Self {
        Self {
            appointment_code: format!("APPT-{:06}", row.id),
            id: row.id,
            doctor: row.doctor_name,
            department: row.department,
            date: row.appt_date.to_string(),
            time: schedule::format_time(row.appt_time),
            token_no: row.token_no,
            status: row.status,
            payment_method: row.payment_method,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelAppointmentResponse {
    pub ok: bool,
    pub appointment_id: i64,
    pub appointment_code: String,
    pub status: AppointmentStatus,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not available on {0}")]
    DoctorNotAvailable(Weekday),

    #[error("Invalid time slot")]
    InvalidSlot,

    #[error("Slot already booked")]
    SlotTaken,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::PatientNotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorNotAvailable(_)
            | AppointmentError::InvalidSlot
            | AppointmentError::InvalidDate(_)
            | AppointmentError::InvalidTime(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::SlotTaken => AppError::Conflict(err.to_string()),
            AppointmentError::Schedule(e) => AppError::Internal(e.to_string()),
            AppointmentError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
