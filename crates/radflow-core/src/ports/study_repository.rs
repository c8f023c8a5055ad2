use crate::domain::StudyRecord;
use async_trait::async_trait;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait StudyRepository: Send + Sync {
    /// All studies with no assigned diagnostician, ordered by priority rank
    /// (cito < asap < normal) then `created_at` ascending.
    ///
    /// Must return a full snapshot or fail; partial results are not allowed.
    async fn pending_studies(&self) -> anyhow::Result<Vec<StudyRecord>>;
}
