// libs/doctor-cell/src/services/schedule.rs
use chrono::{Duration, NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("slot length must be a positive number of minutes")]
    ZeroSlotLength,
}

/// The ordered bookable time points of one working day: `start`,
/// `start + step`, ... while the point is <= `end` (inclusive when `end`
/// falls exactly on the grid). A window with `start > end` yields an empty
/// grid. A non-positive slot length is a doctor-record configuration error
/// and is rejected rather than looped on.
pub fn slot_grid(
    start: NaiveTime,
    end: NaiveTime,
    slot_minutes: i64,
) -> Result<Vec<NaiveTime>, ScheduleError> {
    if slot_minutes <= 0 {
        return Err(ScheduleError::ZeroSlotLength);
    }

    let step = Duration::minutes(slot_minutes);
    let mut grid = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        grid.push(cursor);
        let (next, rollover) = cursor.overflowing_add_signed(step);
        if rollover != 0 {
            // next step would wrap past midnight
            break;
        }
        cursor = next;
    }

    Ok(grid)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
