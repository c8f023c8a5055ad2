/// Distribution run configuration.
///
/// All knobs default to the production values; hosts may override them but
/// the defaults are the documented contract.
use crate::domain::Priority;
use chrono::{Duration, FixedOffset};

/// Conversion between conventional points (UP) and reading time.
pub const MINUTES_PER_UP: f64 = 15.0;

/// Look-ahead parameter of the ATC index.
pub const ATC_K_PARAM: f64 = 2.0;

/// Tolerance permitting a final study to finish past the shift end.
pub const OVERTIME_SLACK_MINUTES: i64 = 30;

/// Shift length assumed when a schedule row has no usable bounds.
pub const DEFAULT_SHIFT_MINUTES: f64 = 480.0;

/// Daily capacity assumed when a doctor record carries none.
pub const DEFAULT_MAX_UP_PER_DAY: f64 = 120.0;

/// Floor for processing time in the ATC index, in hours.
pub const MIN_PROCESSING_HOURS: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct DistributionConfig {
    pub minutes_per_up: f64,
    pub atc_k: f64,
    pub overtime_slack: Duration,
    pub default_shift_minutes: f64,
    pub default_max_up_per_day: f64,
    /// Offset of the clinic's wall clock; naive datetimes are promoted
    /// through it and shift times-of-day are anchored with it.
    pub local_offset: FixedOffset,
    /// Deadline horizons per priority, in hours.
    pub deadline_hours: PriorityTable<i64>,
    /// Objective weights per priority.
    pub weights: PriorityTable<f64>,
    /// Restores the alternative rule-3 semantics: score and assign studies
    /// whose deadline already passed instead of dropping them.
    pub assign_overdue: bool,
}

/// A value per priority class.
#[derive(Debug, Clone, Copy)]
pub struct PriorityTable<T> {
    pub cito: T,
    pub asap: T,
    pub normal: T,
}

impl<T: Copy> PriorityTable<T> {
    pub fn get(&self, priority: Priority) -> T {
        match priority {
            Priority::Cito => self.cito,
            Priority::Asap => self.asap,
            Priority::Normal => self.normal,
        }
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            minutes_per_up: MINUTES_PER_UP,
            atc_k: ATC_K_PARAM,
            overtime_slack: Duration::minutes(OVERTIME_SLACK_MINUTES),
            default_shift_minutes: DEFAULT_SHIFT_MINUTES,
            default_max_up_per_day: DEFAULT_MAX_UP_PER_DAY,
            // Clinic wall clock is UTC+3, no DST
            local_offset: FixedOffset::east_opt(3 * 3600).expect("static offset"),
            deadline_hours: PriorityTable {
                cito: 2,
                asap: 24,
                normal: 72,
            },
            weights: PriorityTable {
                cito: 100.0,
                asap: 10.0,
                normal: 1.0,
            },
            assign_overdue: false,
        }
    }
}

impl DistributionConfig {
    pub fn deadline_for(&self, priority: Priority) -> Duration {
        Duration::hours(self.deadline_hours.get(priority))
    }

    pub fn weight_for(&self, priority: Priority) -> f64 {
        self.weights.get(priority)
    }
}
