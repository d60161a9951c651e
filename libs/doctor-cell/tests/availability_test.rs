use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::SqlitePool;

use doctor_cell::models::{AvailabilityQueryRequest, DoctorError};
use doctor_cell::services::availability::AvailabilityService;
use doctor_cell::services::doctor::DoctorService;
use shared_database::Store;

// 2025-01-06 is a Monday, 2025-01-05 a Sunday.
const MONDAY: &str = "2025-01-06";
const SUNDAY: &str = "2025-01-05";

async fn test_store() -> Store {
    let store = Store::connect_in_memory().await.unwrap();
    store.run_migrations().await.unwrap();
    store
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

async fn seed_doctor(pool: &SqlitePool, name: &str, department: &str, days: &str) -> i64 {
    sqlx::query(
        "INSERT INTO doctors (name, gender, department, days, start_time, end_time, slot_minutes) \
         VALUES (?, 'F', ?, ?, ?, ?, 10)",
    )
    .bind(name)
    .bind(department)
    .bind(days)
    .bind(hm(9, 0))
    .bind(hm(12, 0))
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

async fn seed_appointment(pool: &SqlitePool, doctor_id: i64, date: &str, time: NaiveTime, status: &str) {
    let patient_id: i64 =
        sqlx::query("INSERT INTO patients (name, phone, created_at) VALUES ('Asha', '9000000001', ?)")
            .bind(Utc::now())
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid();

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    sqlx::query(
        "INSERT INTO appointments \
         (patient_id, doctor_id, appt_date, appt_time, token_no, status, payment_method, created_at) \
         VALUES (?, ?, ?, ?, 1, ?, 'direct', ?)",
    )
    .bind(patient_id)
    .bind(doctor_id)
    .bind(date)
    .bind(time)
    .bind(status)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn full_grid_when_nothing_is_booked() {
    let store = test_store().await;
    seed_doctor(store.pool(), "Dr. Shalini", "Cardiology", "Mon,Thu").await;

    let service = AvailabilityService::new(&store);
    let response = service
        .department_availability(AvailabilityQueryRequest {
            department: "Cardiology".to_string(),
            date: MONDAY.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.availability.len(), 1);
    let slots = &response.availability[0].free_slots;
    // 09:00..=12:00 every 10 minutes
    assert_eq!(slots.len(), 19);
    assert_eq!(slots.first().map(String::as_str), Some("09:00"));
    assert_eq!(slots.last().map(String::as_str), Some("12:00"));
}

#[tokio::test]
async fn booked_times_leave_the_free_list() {
    let store = test_store().await;
    let doctor = seed_doctor(store.pool(), "Dr. Shalini", "Cardiology", "Mon,Thu").await;
    seed_appointment(store.pool(), doctor, MONDAY, hm(9, 0), "booked").await;

    let service = AvailabilityService::new(&store);
    let response = service
        .department_availability(AvailabilityQueryRequest {
            department: "Cardiology".to_string(),
            date: MONDAY.to_string(),
        })
        .await
        .unwrap();

    let slots = &response.availability[0].free_slots;
    assert_eq!(slots.len(), 18);
    assert!(!slots.contains(&"09:00".to_string()));
}

#[tokio::test]
async fn cancelled_appointments_still_occupy_their_slot() {
    let store = test_store().await;
    let doctor = seed_doctor(store.pool(), "Dr. Shalini", "Cardiology", "Mon,Thu").await;
    seed_appointment(store.pool(), doctor, MONDAY, hm(9, 0), "cancelled").await;

    let service = AvailabilityService::new(&store);
    let response = service
        .department_availability(AvailabilityQueryRequest {
            department: "Cardiology".to_string(),
            date: MONDAY.to_string(),
        })
        .await
        .unwrap();

    assert!(!response.availability[0].free_slots.contains(&"09:00".to_string()));
}

#[tokio::test]
async fn doctors_off_that_weekday_are_omitted() {
    let store = test_store().await;
    seed_doctor(store.pool(), "Dr. Shalini", "Cardiology", "Mon,Thu").await;
    seed_doctor(store.pool(), "Dr. Manish", "Cardiology", "Tue,Fri,Sun").await;

    let service = AvailabilityService::new(&store);
    let response = service
        .department_availability(AvailabilityQueryRequest {
            department: "Cardiology".to_string(),
            date: SUNDAY.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.availability.len(), 1);
    assert_eq!(response.availability[0].doctor_name, "Dr. Manish");
}

#[tokio::test]
async fn unparseable_date_is_rejected() {
    let store = test_store().await;

    let service = AvailabilityService::new(&store);
    let err = service
        .department_availability(AvailabilityQueryRequest {
            department: "Cardiology".to_string(),
            date: "tomorrow".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DoctorError::InvalidDate(_)));
}

#[tokio::test]
async fn demo_seed_runs_once() {
    let store = test_store().await;

    let service = DoctorService::new(&store);
    service.seed_demo_doctors().await.unwrap();
    service.seed_demo_doctors().await.unwrap();

    let all = service.list_doctors(None).await.unwrap();
    assert_eq!(all.len(), 7);

    let cardiology = service.list_doctors(Some("Cardiology")).await.unwrap();
    assert_eq!(cardiology.len(), 2);
    assert!(cardiology.iter().all(|d| d.department == "Cardiology"));
}
