/// Admissibility of a (study, doctor) pair against the doctor's current
/// mutable state.
///
/// Four rules, all required:
///   1. modality overlap (an empty set on either side is a wildcard),
///   2. points capacity,
///   3. the deadline is still reachable from the doctor's current instant,
///   4. the study finishes inside the shift window plus the overtime slack.
///
/// Rule 3 drops already-overdue studies instead of assigning guaranteed-tardy
/// work; `DistributionConfig::assign_overdue` restores the alternative
/// semantics.
use crate::config::DistributionConfig;
use crate::domain::ModalitySet;
use crate::scheduler::types::{DoctorState, PendingStudy};

pub fn is_feasible(study: &PendingStudy, doctor: &DoctorState, config: &DistributionConfig) -> bool {
    modality_compatible(&study.modalities, &doctor.modalities)
        && doctor.current_load + study.up_value <= doctor.max_up_per_day
        && (config.assign_overdue || doctor.available_time <= study.deadline)
        && fits_shift_window(study, doctor, config)
}

pub fn modality_compatible(study: &ModalitySet, doctor: &ModalitySet) -> bool {
    study.is_empty() || doctor.is_empty() || !study.is_disjoint(doctor)
}

fn fits_shift_window(study: &PendingStudy, doctor: &DoctorState, config: &DistributionConfig) -> bool {
    match doctor.time_end {
        Some(end) => doctor.available_time + study.duration() <= end + config.overtime_slack,
        // Open-ended shift: the same budget expressed in minutes, so the
        // minutes bookkeeping can never exceed max_minutes plus the slack.
        None => {
            doctor.current_minutes + study.duration_minutes
                <= doctor.max_minutes + config.overtime_slack.num_minutes() as f64
        }
    }
}
