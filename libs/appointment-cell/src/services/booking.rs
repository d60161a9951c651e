// libs/appointment-cell/src/services/booking.rs
use chrono::Utc;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::QueryBuilder;
use tracing::{debug, info, warn};

use shared_database::Store;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, AppointmentStatus,
    BookAppointmentRequest, PatientAppointmentRow, APPOINTMENT_COLUMNS,
};
use crate::services::conflict;

pub struct AppointmentBookingService {
    pool: SqlitePool,
}

impl AppointmentBookingService {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Book a slot. Preconditions are checked in order, failing fast:
    /// patient exists, doctor exists, the date's weekday is worked, the time
    /// is on the doctor's grid, the slot is free. The conflict check, token
    /// computation and insert share one transaction; the unique constraint
    /// on (doctor_id, appt_date, appt_time) settles any race the pre-flight
    /// check misses.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let date = schedule_date(&request.date)?;
        let time = schedule_time(&request.time)?;

        info!(
            "Booking appointment for patient {} with doctor {} at {} {}",
            request.patient_id, request.doctor_id, date, request.time
        );

        let mut tx = self.pool.begin().await?;

        let patient_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE id = ?")
            .bind(request.patient_id)
            .fetch_one(&mut *tx)
            .await?;
        if patient_rows == 0 {
            return Err(AppointmentError::PatientNotFound);
        }

        let doctor = conflict::fetch_doctor(&mut *tx, request.doctor_id).await?;
        conflict::ensure_bookable(&doctor, date, time)?;

        if let Some(clash_id) = conflict::find_clash(&mut *tx, doctor.id, date, time, None).await? {
            warn!(
                "Slot {} {} for doctor {} already held by appointment {}",
                date, request.time, doctor.id, clash_id
            );
            return Err(AppointmentError::SlotTaken);
        }

        let booked_before: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE doctor_id = ? AND appt_date = ?",
        )
        .bind(doctor.id)
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;
        let token_no = booked_before + 1;

        let inserted = sqlx::query(
            "INSERT INTO appointments \
             (patient_id, doctor_id, appt_date, appt_time, token_no, status, payment_method, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.patient_id)
        .bind(doctor.id)
        .bind(date)
        .bind(time)
        .bind(token_no)
        .bind(AppointmentStatus::Booked)
        .bind(request.payment_method.unwrap_or_default())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppointmentError::SlotTaken,
            _ => AppointmentError::Database(e),
        })?;

        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?");
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(inserted.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Appointment {} booked with doctor {} (token {})",
            appointment.id, appointment.doctor_id, appointment.token_no
        );
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<Appointment, AppointmentError> {
        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?");

        sqlx::query_as::<_, Appointment>(&query)
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Filtered listing, newest first.
    pub async fn search_appointments(
        &self,
        filter: AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!(
            "Listing appointments, patient={:?} doctor={:?} date={:?}",
            filter.patient_id, filter.doctor_id, filter.date
        );

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE 1 = 1"
        ));
        if let Some(patient_id) = filter.patient_id {
            builder.push(" AND patient_id = ").push_bind(patient_id);
        }
        if let Some(doctor_id) = filter.doctor_id {
            builder.push(" AND doctor_id = ").push_bind(doctor_id);
        }
        if let Some(date) = filter.date {
            builder.push(" AND appt_date = ").push_bind(date);
        }
        builder.push(" ORDER BY id DESC LIMIT ").push_bind(filter.limit);

        let appointments = builder
            .build_query_as::<Appointment>()
            .fetch_all(&self.pool)
            .await?;

        Ok(appointments)
    }

    /// A patient's appointments joined with doctor name and department.
    pub async fn patient_appointments(
        &self,
        patient_id: i64,
    ) -> Result<Vec<PatientAppointmentRow>, AppointmentError> {
        let rows = sqlx::query_as::<_, PatientAppointmentRow>(
            "SELECT a.id, d.name AS doctor_name, d.department, a.appt_date, a.appt_time, \
                    a.token_no, a.status, a.payment_method \
             FROM appointments a JOIN doctors d ON d.id = a.doctor_id \
             WHERE a.patient_id = ? ORDER BY a.id",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

pub(crate) fn schedule_date(raw: &str) -> Result<chrono::NaiveDate, AppointmentError> {
    doctor_cell::services::schedule::parse_date(raw)
        .ok_or_else(|| AppointmentError::InvalidDate(raw.to_string()))
}

pub(crate) fn schedule_time(raw: &str) -> Result<chrono::NaiveTime, AppointmentError> {
    doctor_cell::services::schedule::parse_time(raw)
        .ok_or_else(|| AppointmentError::InvalidTime(raw.to_string()))
}
