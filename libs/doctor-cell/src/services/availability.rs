// libs/doctor-cell/src/services/availability.rs
use chrono::{Datelike, NaiveTime};
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use shared_database::Store;

use crate::models::{AvailabilityQueryRequest, AvailabilityResponse, Doctor, DoctorError, DoctorFreeSlots};
use crate::services::schedule;

pub struct AvailabilityService {
    pool: SqlitePool,
}

impl AvailabilityService {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// Free slots for every doctor of a department who works the weekday of
    /// the requested date. Read-only; slot order is grid (chronological)
    /// order.
    pub async fn department_availability(
        &self,
        request: AvailabilityQueryRequest,
    ) -> Result<AvailabilityResponse, DoctorError> {
        let date = schedule::parse_date(&request.date)
            .ok_or_else(|| DoctorError::InvalidDate(request.date.clone()))?;
        let weekday = date.weekday();

        debug!(
            "Computing availability for {} on {} ({})",
            request.department, date, weekday
        );

        let doctors = sqlx::query_as::<_, Doctor>(
            "SELECT id, name, gender, department, days, start_time, end_time, slot_minutes \
             FROM doctors WHERE department = ? ORDER BY id",
        )
        .bind(&request.department)
        .fetch_all(&self.pool)
        .await?;

        let mut availability = Vec::new();
        for doctor in doctors {
            if !doctor.days.contains(weekday) {
                continue;
            }

            let grid = schedule::slot_grid(doctor.start_time, doctor.end_time, doctor.slot_minutes)?;

            // Any existing appointment holds its slot, cancelled ones included.
            let taken: Vec<NaiveTime> = sqlx::query_scalar(
                "SELECT appt_time FROM appointments WHERE doctor_id = ? AND appt_date = ?",
            )
            .bind(doctor.id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

            let free_slots = grid
                .into_iter()
                .filter(|slot| !taken.contains(slot))
                .map(schedule::format_time)
                .collect();

            availability.push(DoctorFreeSlots {
                doctor_id: doctor.id,
                doctor_name: doctor.name,
                free_slots,
            });
        }

        Ok(AvailabilityResponse {
            date: request.date,
            department: request.department,
            availability,
        })
    }
}
