pub mod assignment_writer;
pub mod clock;
pub mod doctor_repository;
pub mod study_repository;

pub use assignment_writer::AssignmentWriter;
pub use clock::{Clock, FixedClock, SystemClock};
pub use doctor_repository::DoctorRepository;
pub use study_repository::StudyRepository;
