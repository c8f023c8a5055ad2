use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// Study priority classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Cito,
    Asap,
    Normal,
}

impl Priority {
    /// Sort rank: lower is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Cito => 0,
            Priority::Asap => 1,
            Priority::Normal => 2,
        }
    }

    /// Parse a raw priority string; anything unrecognized falls back to normal.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("cito") => Priority::Cito,
            Some("asap") => Priority::Asap,
            _ => Priority::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Cito => "cito",
            Priority::Asap => "asap",
            Priority::Normal => "normal",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw modality descriptor as it arrives from the backing store.
///
/// The upstream column is dynamically typed: sometimes a single tag, sometimes
/// a "/"-separated string, sometimes a list, often null. Only the snapshot
/// boundary inspects this variant; the rest of the core works with the
/// canonical tag set produced by [`crate::modality::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalityField {
    #[default]
    Empty,
    Single(String),
    Many(Vec<String>),
}

/// Canonical modality tag set. Empty means "wildcard": compatible with
/// anything.
pub type ModalitySet = BTreeSet<String>;

// ============================================================================
// RAW SNAPSHOT RECORDS (port output; optionals resolved by the loader)
// ============================================================================

/// A pending study as read from the store. Optional fields carry the upstream
/// nulls; the snapshot loader resolves every one of them to a concrete value.
#[derive(Debug, Clone)]
pub struct StudyRecord {
    pub id: i64,
    pub research_number: String,
    pub priority: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub study_type_id: Option<i64>,
    pub modality: ModalityField,
    pub up_value: Option<f64>,
}

/// An on-shift doctor as read from the store.
#[derive(Debug, Clone)]
pub struct DoctorRecord {
    pub id: i64,
    pub fio_alias: Option<String>,
    pub modality: ModalityField,
    pub max_up_per_day: Option<i64>,
}

/// The schedule row that put the doctor on shift for the target date.
#[derive(Debug, Clone)]
pub struct ShiftRecord {
    pub work_date: NaiveDate,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
}

// ============================================================================
// RESULT ENVELOPE
// ============================================================================

/// One committed assignment, as reported in the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub study_id: i64,
    pub study_number: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub priority: Priority,
    pub weight: f64,
    pub deadline: DateTime<Utc>,
    pub completion_time: DateTime<Utc>,
    pub tardiness_hours: f64,
    pub weighted_tardiness: f64,
    pub up_value: f64,
    pub atc_index: f64,
}

/// Per-doctor load statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorStats {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub assigned: usize,
    pub total_up: f64,
    pub max_up: f64,
    pub load_percent: f64,
    pub remaining_up: f64,
}

/// Assigned-study counts by priority.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriorityStats {
    pub cito: usize,
    pub asap: usize,
    pub normal: usize,
}

impl PriorityStats {
    pub fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::Cito => self.cito += 1,
            Priority::Asap => self.asap += 1,
            Priority::Normal => self.normal += 1,
        }
    }
}

/// An assignment that could not be persisted after retries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnpersistedAssignment {
    pub study_id: i64,
    pub doctor_id: i64,
    pub reason: String,
}

/// The stable result envelope of a distribution run. Field names are the
/// contract with the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionReport {
    pub assigned: usize,
    pub unassigned: usize,
    pub total_tardiness: f64,
    pub total_weighted_tardiness: f64,
    pub avg_tardiness: f64,
    pub assignments: Vec<Assignment>,
    pub doctor_stats: Vec<DoctorStats>,
    pub priority_stats: PriorityStats,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unpersisted: Vec<UnpersistedAssignment>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl DistributionReport {
    /// Envelope for a run that had nothing to do. Not an error.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            assigned: 0,
            unassigned: 0,
            total_tardiness: 0.0,
            total_weighted_tardiness: 0.0,
            avg_tardiness: 0.0,
            assignments: Vec::new(),
            doctor_stats: Vec::new(),
            priority_stats: PriorityStats::default(),
            message: message.into(),
            unpersisted: Vec::new(),
            error: None,
        }
    }
}

/// Read-only preview of what a run would see.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviewReport {
    pub pending_studies: usize,
    pub available_doctors: usize,
    pub message: String,
}
