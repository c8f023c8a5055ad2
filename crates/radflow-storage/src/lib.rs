pub mod db;
pub mod error;
mod models;
pub mod repository;

pub use db::{init_db, table_exists};
pub use error::{Result, StorageError};
pub use repository::{SqliteDoctorRepository, SqliteStudyRepository};
