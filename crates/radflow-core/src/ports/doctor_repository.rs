use crate::domain::{DoctorRecord, ShiftRecord};
use async_trait::async_trait;
use chrono::NaiveDate;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Active doctors with a non-day-off schedule row for `date`, each paired
    /// with that row so shift bounds are known.
    async fn doctors_on_shift(
        &self,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<(DoctorRecord, ShiftRecord)>>;
}
