pub mod errors;
pub mod models;

pub use errors::DistributionError;
pub use models::{
    Assignment, DistributionReport, DoctorRecord, DoctorStats, ModalityField, ModalitySet,
    PreviewReport, Priority, PriorityStats, ShiftRecord, StudyRecord, UnpersistedAssignment,
};
