// libs/doctor-cell/src/services/doctor.rs
use chrono::NaiveTime;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

use shared_database::Store;

use crate::models::{Doctor, DoctorError};

pub struct DoctorService {
    pool: SqlitePool,
}

impl DoctorService {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }

    /// List doctors, optionally restricted to one department.
    pub async fn list_doctors(&self, department: Option<&str>) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors, department filter: {:?}", department);

        let doctors = match department {
            Some(department) => {
                sqlx::query_as::<_, Doctor>(
                    "SELECT id, name, gender, department, days, start_time, end_time, slot_minutes \
                     FROM doctors WHERE department = ? ORDER BY id",
                )
                .bind(department)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Doctor>(
                    "SELECT id, name, gender, department, days, start_time, end_time, slot_minutes \
                     FROM doctors ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(doctors)
    }

    /// Insert the fixed demo roster when the doctors table is empty. Runs
    /// once at startup; a populated table is left untouched.
    pub async fn seed_demo_doctors(&self) -> Result<(), DoctorError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors")
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            debug!("Doctors table already populated ({} rows), skipping seed", existing);
            return Ok(());
        }

        let hm = |hour: u32, minute: u32| NaiveTime::from_hms_opt(hour, minute, 0).unwrap();

        let demo: [(&str, &str, &str, &str, NaiveTime, NaiveTime, i64); 7] = [
            ("Dr. Anil Kumar", "M", "General Medicine", "Mon,Tue,Wed,Thu,Fri,Sat", hm(9, 0), hm(12, 0), 10),
            ("Dr. Meera Nair", "F", "General Medicine", "Mon,Wed,Fri", hm(15, 0), hm(18, 0), 10),
            ("Dr. Shalini", "F", "Cardiology", "Mon,Thu", hm(10, 0), hm(13, 0), 20),
            ("Dr. Manish", "M", "Cardiology", "Tue,Fri", hm(10, 0), hm(13, 0), 20),
            ("Dr. Varun Iyer", "M", "Orthopedics", "Wed,Sat", hm(10, 0), hm(13, 0), 15),
            ("Dr. Priya Menon", "F", "Dentistry", "Tue,Thu,Sat", hm(10, 0), hm(13, 0), 15),
            ("Dr. Venkatesh", "M", "Neurology", "Mon,Wed", hm(15, 0), hm(18, 0), 20),
        ];

        for (name, gender, department, days, start_time, end_time, slot_minutes) in demo {
            sqlx::query(
                "INSERT INTO doctors (name, gender, department, days, start_time, end_time, slot_minutes) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(name)
            .bind(gender)
            .bind(department)
            .bind(days)
            .bind(start_time)
            .bind(end_time)
            .bind(slot_minutes)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} demo doctors", demo.len());
        Ok(())
    }
}
