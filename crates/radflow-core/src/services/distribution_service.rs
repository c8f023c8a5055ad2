/// Distribution service.
///
/// The only component that touches all four ports. A run is: capture `now`,
/// read the snapshot, resolve it into the working set, run the assignment
/// loop, persist the ledger, emit the envelope. Between the snapshot read and
/// the writes the computation is pure and in-memory; two runs must not
/// execute concurrently against the same store (the caller serializes).
use crate::config::DistributionConfig;
use crate::domain::{
    Assignment, DistributionError, DistributionReport, DoctorStats, PreviewReport, PriorityStats,
    UnpersistedAssignment,
};
use crate::ports::{AssignmentWriter, Clock, DoctorRepository, StudyRepository};
use crate::scheduler;
use crate::scheduler::engine::RunOutcome;
use crate::scheduler::types::{DoctorState, PendingStudy};
use crate::time::local_date;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Write retries per assignment before it is reported unpersisted.
const PERSIST_ATTEMPTS: u32 = 3;

pub struct DistributionService {
    clock: Arc<dyn Clock>,
    studies: Arc<dyn StudyRepository>,
    doctors: Arc<dyn DoctorRepository>,
    writer: Arc<dyn AssignmentWriter>,
    config: DistributionConfig,
}

impl DistributionService {
    pub fn new(
        clock: Arc<dyn Clock>,
        studies: Arc<dyn StudyRepository>,
        doctors: Arc<dyn DoctorRepository>,
        writer: Arc<dyn AssignmentWriter>,
    ) -> Self {
        Self::with_config(clock, studies, doctors, writer, DistributionConfig::default())
    }

    pub fn with_config(
        clock: Arc<dyn Clock>,
        studies: Arc<dyn StudyRepository>,
        doctors: Arc<dyn DoctorRepository>,
        writer: Arc<dyn AssignmentWriter>,
        config: DistributionConfig,
    ) -> Self {
        Self {
            clock,
            studies,
            doctors,
            writer,
            config,
        }
    }

    /// Perform a full distribution run against "now".
    #[instrument(skip(self))]
    pub async fn distribute(&self) -> Result<DistributionReport, DistributionError> {
        let now = self.clock.now();
        let date = local_date(now, self.config.local_offset);

        let study_records = self
            .studies
            .pending_studies()
            .await
            .map_err(|e| DistributionError::SnapshotUnavailable(e.to_string()))?;
        let doctor_rows = self
            .doctors
            .doctors_on_shift(date)
            .await
            .map_err(|e| DistributionError::SnapshotUnavailable(e.to_string()))?;

        info!(
            pending = study_records.len(),
            on_shift = doctor_rows.len(),
            %date,
            "starting distribution run"
        );

        if study_records.is_empty() {
            return Ok(DistributionReport::empty("No pending studies to distribute"));
        }
        if doctor_rows.is_empty() {
            let mut report =
                DistributionReport::empty(format!("No doctors on shift for {date}"));
            report.unassigned = study_records.len();
            return Ok(report);
        }

        let snapshot_total = study_records.len();

        // Resolve the snapshot into total working records; every optional is
        // defaulted here and nowhere else.
        let mut studies: Vec<PendingStudy> = study_records
            .into_iter()
            .map(|r| PendingStudy::from_record(r, &self.config, now))
            .collect();
        studies.sort_by(|a, b| {
            a.priority
                .rank()
                .cmp(&b.priority.rank())
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        let mut doctors: Vec<DoctorState> = doctor_rows
            .into_iter()
            .map(|(d, s)| DoctorState::from_record(d, &s, &self.config, now))
            .collect();
        doctors.sort_by_key(|d| d.id);

        let outcome = scheduler::run(studies, doctors, &self.config)?;

        let unpersisted = self.persist(&outcome.assignments).await;

        let report = build_report(outcome, snapshot_total, unpersisted)?;
        info!(
            assigned = report.assigned,
            unassigned = report.unassigned,
            total_weighted_tardiness = report.total_weighted_tardiness,
            "distribution run finished"
        );
        Ok(report)
    }

    /// Read-only counts over the same snapshot predicates. Never mutates.
    #[instrument(skip(self))]
    pub async fn preview(&self) -> Result<PreviewReport, DistributionError> {
        let now = self.clock.now();
        let date = local_date(now, self.config.local_offset);

        let pending = self
            .studies
            .pending_studies()
            .await
            .map_err(|e| DistributionError::SnapshotUnavailable(e.to_string()))?
            .len();
        let available = self
            .doctors
            .doctors_on_shift(date)
            .await
            .map_err(|e| DistributionError::SnapshotUnavailable(e.to_string()))?
            .len();

        let message = if pending > 0 && available > 0 {
            "Ready for distribution".to_string()
        } else {
            "No data".to_string()
        };

        Ok(PreviewReport {
            pending_studies: pending,
            available_doctors: available,
            message,
        })
    }

    /// Persist the ledger study by study; failures degrade the envelope
    /// instead of failing the run.
    async fn persist(&self, assignments: &[Assignment]) -> Vec<UnpersistedAssignment> {
        let mut failed = Vec::new();
        for assignment in assignments {
            let mut last_error: Option<anyhow::Error> = None;
            for attempt in 1..=PERSIST_ATTEMPTS {
                match self
                    .writer
                    .assign(assignment.study_id, assignment.doctor_id)
                    .await
                {
                    Ok(()) => {
                        last_error = None;
                        break;
                    }
                    Err(e) => {
                        warn!(
                            study_id = assignment.study_id,
                            doctor_id = assignment.doctor_id,
                            attempt,
                            error = %e,
                            "assignment write failed"
                        );
                        last_error = Some(e);
                    }
                }
            }
            if let Some(e) = last_error {
                failed.push(UnpersistedAssignment {
                    study_id: assignment.study_id,
                    doctor_id: assignment.doctor_id,
                    reason: e.to_string(),
                });
            }
        }
        failed
    }
}

/// Assemble the envelope. Aggregates are computed from the raw ledger, then
/// everything user-facing is rounded: hours to 2 decimals, percents to 1,
/// points to 1.
fn build_report(
    outcome: RunOutcome,
    snapshot_total: usize,
    unpersisted: Vec<UnpersistedAssignment>,
) -> Result<DistributionReport, DistributionError> {
    let assigned = outcome.assignments.len();
    let unassigned = outcome.unassigned.len();

    if assigned + unassigned != snapshot_total {
        return Err(DistributionError::invariant(
            "I5",
            format!(
                "assigned {assigned} + unassigned {unassigned} != snapshot {snapshot_total}"
            ),
        ));
    }

    let total_tardiness: f64 = outcome.assignments.iter().map(|a| a.tardiness_hours).sum();
    let total_weighted: f64 = outcome
        .assignments
        .iter()
        .map(|a| a.weighted_tardiness)
        .sum();
    let avg_tardiness = if assigned > 0 {
        total_tardiness / assigned as f64
    } else {
        0.0
    };

    let mut priority_stats = PriorityStats::default();
    for assignment in &outcome.assignments {
        priority_stats.bump(assignment.priority);
    }

    let assignments: Vec<Assignment> = outcome
        .assignments
        .into_iter()
        .map(|a| Assignment {
            tardiness_hours: round_to(a.tardiness_hours, 2),
            weighted_tardiness: round_to(a.weighted_tardiness, 2),
            up_value: round_to(a.up_value, 1),
            ..a
        })
        .collect();

    let doctor_stats: Vec<DoctorStats> = outcome
        .doctors
        .iter()
        .map(|d| DoctorStats {
            doctor_id: d.id,
            doctor_name: d.name.clone(),
            assigned: d.assigned_study_ids.len(),
            total_up: round_to(d.current_load, 1),
            max_up: d.max_up_per_day,
            load_percent: round_to(d.load_percent(), 1),
            remaining_up: round_to(d.remaining_up(), 1),
        })
        .collect();

    let mut message = format!("Assigned {assigned} of {snapshot_total} pending studies");
    let error = if unpersisted.is_empty() {
        None
    } else {
        message.push_str(&format!(
            "; {} assignments could not be persisted",
            unpersisted.len()
        ));
        Some(format!(
            "PersistenceFailure: {} of {assigned} assignments were not written",
            unpersisted.len()
        ))
    };

    Ok(DistributionReport {
        assigned,
        unassigned,
        total_tardiness: round_to(total_tardiness, 2),
        total_weighted_tardiness: round_to(total_weighted, 2),
        avg_tardiness: round_to(avg_tardiness, 2),
        assignments,
        doctor_stats,
        priority_stats,
        message,
        unpersisted,
        error,
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
