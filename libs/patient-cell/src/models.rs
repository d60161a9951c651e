use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub alt_phone: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub symptoms: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub phone: String,
    pub alt_phone: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub symptoms: Option<String>,
}

/// Listing row; symptoms stay out of search results.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PatientSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub alt_phone: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientLookupResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl From<Patient> for PatientLookupResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            phone: patient.phone,
            email: patient.email,
        }
    }
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("No patient with that phone")]
    PhoneNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound | PatientError::PhoneNotFound => {
                AppError::NotFound(err.to_string())
            }
            PatientError::Validation(msg) => AppError::ValidationError(msg),
            PatientError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
