/// The assignment loop.
///
/// Repeatedly selects the globally best feasible (study, doctor) pair by ATC
/// index and commits it to the doctor's bookkeeping, until the backlog is
/// empty or no feasible pair remains. Selection is a single global-best scan:
/// there is deliberately no per-doctor greedy path.
use crate::config::DistributionConfig;
use crate::domain::{Assignment, DistributionError};
use crate::scheduler::feasibility::is_feasible;
use crate::scheduler::scoring::{atc_index, hours_between, indices_equal};
use crate::scheduler::types::{DoctorState, PendingStudy};
use chrono::{DateTime, Utc};

/// Safety net: consecutive loop iterations that fail to shrink the backlog
/// before the run is force-terminated. Never reached when feasibility and
/// commit bookkeeping agree.
const MAX_STALLED_ITERATIONS: usize = 100;

/// Everything the loop produced, still unrounded.
#[derive(Debug)]
pub struct RunOutcome {
    /// Committed assignments in global commit order.
    pub assignments: Vec<Assignment>,
    /// Final doctor bookkeeping, in snapshot order.
    pub doctors: Vec<DoctorState>,
    /// Studies no feasible doctor remained for.
    pub unassigned: Vec<PendingStudy>,
}

struct Candidate {
    study_idx: usize,
    doctor_idx: usize,
    index: f64,
}

pub fn run(
    mut studies: Vec<PendingStudy>,
    mut doctors: Vec<DoctorState>,
    config: &DistributionConfig,
) -> Result<RunOutcome, DistributionError> {
    let mut assignments: Vec<Assignment> = Vec::new();
    let mut stalled = 0usize;

    while !studies.is_empty() {
        let before = studies.len();

        let Some(best) = select_best(&studies, &doctors, config) else {
            // No feasible pair remains
            break;
        };

        let study = studies.remove(best.study_idx);
        let assignment = commit(study, &mut doctors[best.doctor_idx], best.index, config)?;
        tracing::debug!(
            study_id = assignment.study_id,
            doctor_id = assignment.doctor_id,
            atc_index = assignment.atc_index,
            "committed assignment"
        );
        assignments.push(assignment);

        if studies.len() < before {
            stalled = 0;
        } else {
            stalled += 1;
            if stalled >= MAX_STALLED_ITERATIONS {
                tracing::warn!(stalled, "assignment loop stalled, forcing termination");
                break;
            }
        }
    }

    Ok(RunOutcome {
        assignments,
        doctors,
        unassigned: studies,
    })
}

/// Global-best scan over all pairs with a doctor that still has budget.
///
/// Ties at equal index break by priority rank, then `created_at`, then lower
/// study id; across doctors by earlier `available_time`, then lower doctor
/// id. The scan order makes the result deterministic for byte-equal inputs.
fn select_best(
    studies: &[PendingStudy],
    doctors: &[DoctorState],
    config: &DistributionConfig,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for (doctor_idx, doctor) in doctors.iter().enumerate() {
        if !doctor.has_capacity() {
            continue;
        }
        for (study_idx, study) in studies.iter().enumerate() {
            if !is_feasible(study, doctor, config) {
                continue;
            }
            let candidate = Candidate {
                study_idx,
                doctor_idx,
                index: atc_index(study, doctor.available_time, config),
            };
            best = match best {
                None => Some(candidate),
                Some(current) => {
                    if beats(&candidate, &current, studies, doctors) {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }
    }

    best
}

fn beats(a: &Candidate, b: &Candidate, studies: &[PendingStudy], doctors: &[DoctorState]) -> bool {
    if !indices_equal(a.index, b.index) {
        return a.index > b.index;
    }

    let (sa, sb) = (&studies[a.study_idx], &studies[b.study_idx]);
    let study_order = sa
        .priority
        .rank()
        .cmp(&sb.priority.rank())
        .then(sa.created_at.cmp(&sb.created_at))
        .then(sa.id.cmp(&sb.id));
    if study_order != std::cmp::Ordering::Equal {
        return study_order == std::cmp::Ordering::Less;
    }

    let (da, db) = (&doctors[a.doctor_idx], &doctors[b.doctor_idx]);
    da.available_time
        .cmp(&db.available_time)
        .then(da.id.cmp(&db.id))
        == std::cmp::Ordering::Less
}

/// Apply one assignment to the doctor's bookkeeping and record the result.
/// The feasibility predicate held immediately before this call; the invariant
/// checks here guard the bookkeeping itself.
fn commit(
    study: PendingStudy,
    doctor: &mut DoctorState,
    index: f64,
    config: &DistributionConfig,
) -> Result<Assignment, DistributionError> {
    let completion: DateTime<Utc> = doctor.available_time + study.duration();

    // I2 requires available_time to be non-decreasing; equality is legal
    if completion < doctor.available_time {
        return Err(DistributionError::invariant(
            "I2",
            format!("study {} would move doctor {} backwards", study.id, doctor.id),
        ));
    }

    let new_load = doctor.current_load + study.up_value;
    if new_load > doctor.max_up_per_day {
        return Err(DistributionError::invariant(
            "I1",
            format!(
                "doctor {} load {new_load} exceeds {}",
                doctor.id, doctor.max_up_per_day
            ),
        ));
    }

    let new_minutes = doctor.current_minutes + study.duration_minutes;
    let minutes_cap = doctor.max_minutes + config.overtime_slack.num_minutes() as f64;
    if new_minutes > minutes_cap + 1e-9 {
        return Err(DistributionError::invariant(
            "I1",
            format!(
                "doctor {} minutes {new_minutes} exceeds {minutes_cap}",
                doctor.id
            ),
        ));
    }

    if doctor.assigned_study_ids.contains(&study.id) {
        return Err(DistributionError::invariant(
            "I3",
            format!("study {} committed twice to doctor {}", study.id, doctor.id),
        ));
    }

    doctor.assigned_study_ids.push(study.id);
    doctor.available_time = completion;
    doctor.current_load = new_load;
    doctor.current_minutes = new_minutes;

    let tardiness_hours = hours_between(study.deadline, completion).max(0.0);

    Ok(Assignment {
        study_id: study.id,
        study_number: study.research_number,
        doctor_id: doctor.id,
        doctor_name: doctor.name.clone(),
        priority: study.priority,
        weight: study.weight,
        deadline: study.deadline,
        completion_time: completion,
        tardiness_hours,
        weighted_tardiness: study.weight * tardiness_hours,
        up_value: study.up_value,
        atc_index: index,
    })
}
