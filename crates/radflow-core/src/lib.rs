pub mod config;
pub mod domain;
pub mod modality;
pub mod ports;
pub mod scheduler;
pub mod services;
pub mod time;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types
pub use config::{DistributionConfig, PriorityTable};
pub use domain::{
    Assignment, DistributionError, DistributionReport, DoctorRecord, DoctorStats, ModalityField,
    ModalitySet, PreviewReport, Priority, PriorityStats, ShiftRecord, StudyRecord,
    UnpersistedAssignment,
};
pub use ports::{AssignmentWriter, Clock, DoctorRepository, StudyRepository, SystemClock};
pub use scheduler::{atc_index, is_feasible, DoctorState, PendingStudy, RunOutcome};
pub use services::DistributionService;
