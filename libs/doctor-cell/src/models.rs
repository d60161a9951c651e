use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::AppError;

use crate::services::schedule::{self, ScheduleError};

/// The weekdays a doctor accepts appointments on. Stored as a CSV string
/// ("Mon,Tue,Wed") in the doctors table; parsing and rendering happen only
/// at that boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDays(Vec<Weekday>);

#[derive(Error, Debug)]
#[error("invalid working days: {0}")]
pub struct WorkingDaysParseError(String);

impl WorkingDays {
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for WorkingDays {
    type Err = WorkingDaysParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let days = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<Weekday>()
                    .map_err(|_| WorkingDaysParseError(raw.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(days))
    }
}

impl TryFrom<String> for WorkingDays {
    type Error = WorkingDaysParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for WorkingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for day in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", day)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub gender: Option<String>,
    pub department: String,
    #[sqlx(try_from = "String")]
    pub days: WorkingDays,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_minutes: i64,
}

/// Wire form of a doctor record; times rendered as "HH:MM".
#[derive(Debug, Clone, Serialize)]
pub struct DoctorSummary {
    pub id: i64,
    pub name: String,
    pub gender: Option<String>,
    pub department: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub slot_minutes: i64,
}

impl From<Doctor> for DoctorSummary {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            gender: doctor.gender,
            department: doctor.department,
            days: doctor.days.to_string(),
            start_time: schedule::format_time(doctor.start_time),
            end_time: schedule::format_time(doctor.end_time),
            slot_minutes: doctor.slot_minutes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQueryRequest {
    pub department: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorFreeSlots {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub free_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub department: String,
    pub availability: Vec<DoctorFreeSlots>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::InvalidDate(_) => AppError::BadRequest(err.to_string()),
            DoctorError::Schedule(e) => AppError::Internal(e.to_string()),
            DoctorError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
