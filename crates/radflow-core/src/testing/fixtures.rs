//! Reusable builders for snapshot records.
//!
//! Keeps mock setups across test files from duplicating record literals.
use crate::domain::{DoctorRecord, ModalityField, ShiftRecord, StudyRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// The run date used throughout the tests.
pub fn work_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// An instant on the run date.
pub fn utc(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
}

pub fn study_record(
    id: i64,
    priority: &str,
    created_at: Option<DateTime<Utc>>,
    modality: &str,
    up_value: f64,
) -> StudyRecord {
    StudyRecord {
        id,
        research_number: format!("RN-{id:04}"),
        priority: Some(priority.to_string()),
        created_at,
        study_type_id: Some(1),
        modality: if modality.is_empty() {
            ModalityField::Empty
        } else {
            ModalityField::Single(modality.to_string())
        },
        up_value: Some(up_value),
    }
}

pub fn doctor_record(id: i64, modality: &str) -> DoctorRecord {
    DoctorRecord {
        id,
        fio_alias: Some(format!("Doctor {id}")),
        modality: if modality.is_empty() {
            ModalityField::Empty
        } else {
            ModalityField::Single(modality.to_string())
        },
        max_up_per_day: Some(120),
    }
}

pub fn shift(start: Option<(u32, u32)>, end: Option<(u32, u32)>) -> ShiftRecord {
    ShiftRecord {
        work_date: work_date(),
        time_start: start.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
        time_end: end.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
    }
}

/// The standard 09:00–17:00 day shift.
pub fn day_shift() -> ShiftRecord {
    shift(Some((9, 0)), Some((17, 0)))
}
