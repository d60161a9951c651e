// libs/appointment-cell/src/services/conflict.rs
//! Slot validation shared by booking and reschedule. All checks run on the
//! caller's transaction so they stay serialized with the write that follows.

use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::sqlite::SqliteConnection;

use doctor_cell::models::Doctor;
use doctor_cell::services::schedule;

use crate::models::AppointmentError;

pub(crate) async fn fetch_doctor(
    conn: &mut SqliteConnection,
    doctor_id: i64,
) -> Result<Doctor, AppointmentError> {
    sqlx::query_as::<_, Doctor>(
        "SELECT id, name, gender, department, days, start_time, end_time, slot_minutes \
         FROM doctors WHERE id = ?",
    )
    .bind(doctor_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppointmentError::DoctorNotFound)
}

/// The weekday gate and the grid-membership gate, in that order.
pub(crate) fn ensure_bookable(
    doctor: &Doctor,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<(), AppointmentError> {
    let weekday = date.weekday();
    if !doctor.days.contains(weekday) {
        return Err(AppointmentError::DoctorNotAvailable(weekday));
    }

    let grid = schedule::slot_grid(doctor.start_time, doctor.end_time, doctor.slot_minutes)?;
    if !grid.contains(&time) {
        return Err(AppointmentError::InvalidSlot);
    }

    Ok(())
}

/// Id of any appointment already holding (doctor, date, time), regardless of
/// status; a cancelled booking still consumes its slot. `exclude` skips the
/// appointment being rescheduled so it may land on its own slot.
pub(crate) async fn find_clash(
    conn: &mut SqliteConnection,
    doctor_id: i64,
    date: NaiveDate,
    time: NaiveTime,
    exclude: Option<i64>,
) -> Result<Option<i64>, AppointmentError> {
    let clash: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM appointments WHERE doctor_id = ? AND appt_date = ? AND appt_time = ?",
    )
    .bind(doctor_id)
    .bind(date)
    .bind(time)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(clash.filter(|id| Some(*id) != exclude))
}
