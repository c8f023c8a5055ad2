/// Working records for a distribution run.
///
/// These are total types: every optional the store may carry has been
/// resolved by the time a value of these types exists. They are built once by
/// the snapshot loader, mutated only by the assignment loop, and dropped when
/// the run's envelope has been produced.
use crate::config::DistributionConfig;
use crate::domain::{DoctorRecord, ModalitySet, Priority, ShiftRecord, StudyRecord};
use crate::modality;
use crate::time::at_local;
use chrono::{DateTime, Duration, Utc};

/// A pending study with its per-run derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStudy {
    pub id: i64,
    pub research_number: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub modalities: ModalitySet,
    pub up_value: f64,
    pub duration_minutes: f64,
    pub deadline: DateTime<Utc>,
    pub weight: f64,
}

impl PendingStudy {
    /// Resolve a raw record into a working study.
    ///
    /// Defaults per the snapshot contract: missing/invalid priority → normal,
    /// missing `created_at` → `now`, non-positive or missing `up_value` → 1.0.
    pub fn from_record(record: StudyRecord, config: &DistributionConfig, now: DateTime<Utc>) -> Self {
        let priority = Priority::parse_or_default(record.priority.as_deref());
        let created_at = record.created_at.unwrap_or(now);
        let up_value = record
            .up_value
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(1.0);

        Self {
            id: record.id,
            research_number: record.research_number,
            priority,
            created_at,
            modalities: modality::normalize(&record.modality),
            up_value,
            duration_minutes: up_value * config.minutes_per_up,
            deadline: created_at + config.deadline_for(priority),
            weight: config.weight_for(priority),
        }
    }

    /// Processing time as a duration, for shift-window arithmetic. A
    /// sub-millisecond `duration_minutes` would round to zero and stall the
    /// doctor's clock, so the rounding is floored at one millisecond.
    pub fn duration(&self) -> Duration {
        Duration::milliseconds(((self.duration_minutes * 60_000.0).round() as i64).max(1))
    }
}

/// A doctor's mutable bookkeeping for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorState {
    pub id: i64,
    pub name: String,
    pub modalities: ModalitySet,
    pub max_up_per_day: f64,
    pub max_minutes: f64,
    /// Absolute end of shift on the target date, when defined.
    pub time_end: Option<DateTime<Utc>>,
    /// Earliest moment the doctor can begin the next study. Monotonically
    /// non-decreasing over the run.
    pub available_time: DateTime<Utc>,
    pub current_load: f64,
    pub current_minutes: f64,
    pub assigned_study_ids: Vec<i64>,
}

impl DoctorState {
    /// Resolve a (doctor, schedule) pair into a working record.
    ///
    /// `max_minutes` derives from the shift window; a missing or degenerate
    /// window falls back to the default shift length. `available_time` starts
    /// at the shift start when defined, otherwise at `now`.
    pub fn from_record(
        doctor: DoctorRecord,
        shift: &ShiftRecord,
        config: &DistributionConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let name = doctor
            .fio_alias
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("Doctor {}", doctor.id));

        let max_up_per_day = doctor
            .max_up_per_day
            .filter(|v| *v > 0)
            .map(|v| v as f64)
            .unwrap_or(config.default_max_up_per_day);

        let time_start = shift
            .time_start
            .and_then(|t| at_local(shift.work_date, t, config.local_offset));
        let time_end = shift
            .time_end
            .and_then(|t| at_local(shift.work_date, t, config.local_offset));

        let max_minutes = match (time_start, time_end) {
            (Some(start), Some(end)) if end > start => {
                (end - start).num_minutes() as f64
            }
            _ => config.default_shift_minutes,
        };

        Self {
            id: doctor.id,
            name,
            modalities: modality::normalize(&doctor.modality),
            max_up_per_day,
            max_minutes,
            time_end,
            available_time: time_start.unwrap_or(now),
            current_load: 0.0,
            current_minutes: 0.0,
            assigned_study_ids: Vec::new(),
        }
    }

    pub fn remaining_up(&self) -> f64 {
        self.max_up_per_day - self.current_load
    }

    pub fn remaining_minutes(&self) -> f64 {
        self.max_minutes - self.current_minutes
    }

    /// A doctor whose points or minutes budget is spent is out of the run for
    /// good.
    pub fn has_capacity(&self) -> bool {
        self.remaining_up() > 0.0 && self.remaining_minutes() > 0.0
    }

    pub fn load_percent(&self) -> f64 {
        if self.max_up_per_day > 0.0 {
            self.current_load / self.max_up_per_day * 100.0
        } else {
            0.0
        }
    }
}
