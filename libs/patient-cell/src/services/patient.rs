// libs/patient-cell/src/services/patient.rs
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use shared_database::Store;

use crate::models::{Patient, PatientError, PatientSummary, RegisterPatientRequest};

const PATIENT_COLUMNS: &str =
    "id, name, phone, alt_phone, email, age, gender, symptoms, created_at";

pub struct PatientService {
    pool: SqlitePool,
}

impl PatientService {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Register a new patient. Records are immutable after creation; there
    /// is no update path.
    pub async fn register_patient(
        &self,
        request: RegisterPatientRequest,
    ) -> Result<Patient, PatientError> {
        let name = request.name.trim().to_string();
        let phone = request.phone.trim().to_string();

        if name.is_empty() {
            return Err(PatientError::Validation("name is required".to_string()));
        }
        if phone.is_empty() {
            return Err(PatientError::Validation("phone is required".to_string()));
        }

        debug!("Registering patient {}", name);

        let result = sqlx::query(
            "INSERT INTO patients (name, phone, alt_phone, email, age, gender, symptoms, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&name)
        .bind(&phone)
        .bind(&request.alt_phone)
        .bind(&request.email)
        .bind(request.age)
        .bind(&request.gender)
        .bind(&request.symptoms)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let patient = self.get_patient(result.last_insert_rowid()).await?;
        debug!("Patient registered with id {}", patient.id);

        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?");

        sqlx::query_as::<_, Patient>(&query)
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PatientError::NotFound)
    }

    /// Substring search over name and phone, newest first, paginated.
    pub async fn search_patients(
        &self,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PatientSummary>, PatientError> {
        debug!("Searching patients, q={:?} limit={} offset={}", query, limit, offset);

        let patients = match query {
            Some(q) => {
                let like = format!("%{}%", q);
                sqlx::query_as::<_, PatientSummary>(
                    "SELECT id, name, phone, alt_phone, email, age, gender, created_at \
                     FROM patients WHERE name LIKE ? OR phone LIKE ? \
                     ORDER BY id DESC LIMIT ? OFFSET ?",
                )
                .bind(&like)
                .bind(&like)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PatientSummary>(
                    "SELECT id, name, phone, alt_phone, email, age, gender, created_at \
                     FROM patients ORDER BY id DESC LIMIT ? OFFSET ?",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(patients)
    }

    /// Exact-phone lookup, first match.
    pub async fn lookup_by_phone(&self, phone: &str) -> Result<Patient, PatientError> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE phone = ? LIMIT 1");

        sqlx::query_as::<_, Patient>(&query)
            .bind(phone.trim())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PatientError::PhoneNotFound)
    }
}
