/// Workload distribution scheduler.
///
/// An Apparent Tardiness Cost policy over an unrelated-parallel-machine
/// problem: studies carry release dates, priority-derived deadlines and
/// weights; doctors carry modality sets, daily point capacity and shift
/// windows. The loop minimizes total weighted tardiness heuristically.
pub mod engine;
pub mod feasibility;
pub mod scoring;
pub mod types;

pub use engine::{run, RunOutcome};
pub use feasibility::{is_feasible, modality_compatible};
pub use scoring::{atc_index, processing_hours, slack_hours};
pub use types::{DoctorState, PendingStudy};
