// libs/appointment-cell/src/services/lifecycle.rs
use sqlx::sqlite::SqlitePool;
use tracing::{info, warn};

use shared_database::Store;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, CancelAppointmentRequest,
    RescheduleAppointmentRequest, APPOINTMENT_COLUMNS,
};
use crate::services::booking::{schedule_date, schedule_time};
use crate::services::conflict;

pub struct AppointmentLifecycleService {
    pool: SqlitePool,
}

impl AppointmentLifecycleService {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Move an appointment to a new date/time, optionally to a new doctor.
    /// Runs the booking-time checks against the target slot, except the
    /// clash check skips the appointment itself, so a move onto its own
    /// current slot is a no-op success. token_no and status are left as
    /// they are: a moved appointment keeps the token issued at booking.
    pub async fn reschedule_appointment(
        &self,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let date = schedule_date(&request.date)?;
        let time = schedule_time(&request.time)?;

        info!(
            "Rescheduling appointment {} to {} {}",
            request.appointment_id, date, request.time
        );

        let mut tx = self.pool.begin().await?;

        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?");
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(request.appointment_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        let doctor_id = request.new_doctor_id.unwrap_or(appointment.doctor_id);
        let doctor = conflict::fetch_doctor(&mut *tx, doctor_id).await?;
        conflict::ensure_bookable(&doctor, date, time)?;

        if let Some(clash_id) =
            conflict::find_clash(&mut *tx, doctor.id, date, time, Some(appointment.id)).await?
        {
            warn!(
                "Reschedule target {} {} for doctor {} already held by appointment {}",
                date, request.time, doctor.id, clash_id
            );
            return Err(AppointmentError::SlotTaken);
        }

        sqlx::query("UPDATE appointments SET doctor_id = ?, appt_date = ?, appt_time = ? WHERE id = ?")
            .bind(doctor.id)
            .bind(date)
            .bind(time)
            .bind(appointment.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => AppointmentError::SlotTaken,
                _ => AppointmentError::Database(e),
            })?;

        let updated = sqlx::query_as::<_, Appointment>(&query)
            .bind(appointment.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Appointment {} rescheduled", updated.id);
        Ok(updated)
    }

    /// Flip status to cancelled. The row stays, its token is never reissued
    /// and its slot is not released.
    pub async fn cancel_appointment(
        &self,
        request: CancelAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(AppointmentStatus::Cancelled)
            .bind(request.appointment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppointmentError::NotFound);
        }

        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?");
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(request.appointment_id)
            .fetch_one(&self.pool)
            .await?;

        info!("Appointment {} cancelled", appointment.id);
        Ok(appointment)
    }
}
